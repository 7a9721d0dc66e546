//! `grpresolve init` command

use anyhow::Result;

use crate::cli::InitArgs;
use crate::commands::Session;
use grpresolve::ops::{apply_groups, InitOptions};

pub fn execute(args: InitArgs, session: &Session) -> Result<()> {
    let options = InitOptions {
        dry_run: args.dry_run,
        ceiling: args.ceiling,
    };

    let report = apply_groups(&session.resolver, &args.user, args.group, &options)?;

    if args.dry_run {
        for (i, count) in report.attempts.iter().enumerate() {
            let outcome = if i + 1 == report.attempts.len() {
                "accepted"
            } else {
                "rejected"
            };
            println!("setgroups({}) {}", count, outcome);
        }

        let groups: Vec<String> = report.groups.iter().map(|g| g.to_string()).collect();
        println!("would install: {}", groups.join(" "));
    } else {
        tracing::info!(
            "installed {} group(s) for {} (primary {})",
            report.installed,
            report.user,
            report.group
        );
    }

    Ok(())
}
