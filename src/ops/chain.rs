//! Describing the service chain a resolver walks.

use std::fmt::Write;

use crate::resolver::Resolver;

/// One service as configured.
#[derive(Debug, Clone)]
pub struct ServiceLine {
    pub name: String,
    /// Whether a source is registered for the name.
    pub registered: bool,
    /// Non-default actions, as `STATUS=action`.
    pub overrides: Vec<String>,
}

/// The chain as a user would want to read it.
#[derive(Debug, Clone)]
pub struct ChainReport {
    pub database: String,
    pub dedicated: bool,
    pub services: Vec<ServiceLine>,
}

impl ChainReport {
    /// Services with no registered source.
    pub fn unregistered(&self) -> Vec<&str> {
        self.services
            .iter()
            .filter(|s| !s.registered)
            .map(|s| s.name.as_str())
            .collect()
    }
}

/// Describe the resolver's chain.
pub fn describe_chain(resolver: &Resolver) -> ChainReport {
    let chain = resolver.chain();

    let services = chain
        .entries
        .iter()
        .map(|entry| ServiceLine {
            name: entry.spec.name.clone(),
            registered: entry.source.is_some(),
            overrides: entry
                .spec
                .actions
                .overrides()
                .into_iter()
                .map(|(status, action)| format!("{}={}", status, action))
                .collect(),
        })
        .collect();

    ChainReport {
        database: chain.database.clone(),
        dedicated: chain.dedicated,
        services,
    }
}

/// Format a chain report for the terminal.
pub fn format_chain(report: &ChainReport) -> String {
    let mut output = String::new();

    let mode = if report.dedicated {
        "dedicated"
    } else {
        "shared with group lookups; SUCCESS never stops the walk"
    };
    let _ = writeln!(output, "database: {} ({})", report.database, mode);

    for service in &report.services {
        let _ = write!(output, "  {}", service.name);
        if !service.overrides.is_empty() {
            let _ = write!(output, " [{}]", service.overrides.join(" "));
        }
        if !service.registered {
            output.push_str(" (no implementation)");
        }
        output.push('\n');
    }

    output
}
