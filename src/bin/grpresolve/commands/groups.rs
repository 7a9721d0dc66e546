//! `grpresolve groups` command

use anyhow::Result;

use crate::cli::GroupsArgs;
use crate::commands::Session;
use grpresolve::ops::{format_groups, list_groups, GroupsOptions};
use grpresolve::util::diagnostic::{emit, suggestions};
use grpresolve::util::Diagnostic;

pub fn execute(args: GroupsArgs, session: &Session) -> Result<()> {
    let options = GroupsOptions {
        capacity: args.capacity,
    };

    let report = list_groups(&session.resolver, &args.user, args.group, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_groups(&report));
    }

    if !report.complete {
        let diag = Diagnostic::warning(format!(
            "buffer of {} slot(s) is too small for `{}`",
            report.groups.len(),
            report.user
        ))
        .with_context(format!("{} groups found", report.total));
        emit(&diag, session.color);
        eprintln!("{}", suggestions::TOO_SMALL);
        std::process::exit(1);
    }

    Ok(())
}
