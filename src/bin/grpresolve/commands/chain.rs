//! `grpresolve chain` command

use anyhow::Result;

use crate::commands::Session;
use grpresolve::ops::{describe_chain, format_chain};
use grpresolve::util::diagnostic::{emit, suggestions};
use grpresolve::util::Diagnostic;

pub fn execute(session: &Session) -> Result<()> {
    let report = describe_chain(&session.resolver);
    print!("{}", format_chain(&report));

    let unregistered = report.unregistered();
    if !unregistered.is_empty() {
        let diag = Diagnostic::note(format!(
            "no implementation for: {}",
            unregistered.join(", ")
        ))
        .with_location(session.config.nsswitch_path());
        emit(&diag, session.color);
        eprintln!("{}", suggestions::UNKNOWN_SERVICE);
    }

    Ok(())
}
