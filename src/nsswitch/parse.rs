//! Parser for nsswitch.conf-style service lines.
//!
//! ```text
//! # database: service [STATUS=action ...] service ...
//! group:      files [NOTFOUND=return] ldap
//! initgroups: files [!UNAVAIL=return]
//! ```

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::core::{Action, NssStatus};
use crate::nsswitch::{Database, ServiceSpec};

/// Syntax error in an nsswitch configuration.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("{message}")]
#[diagnostic(
    code(grpresolve::nsswitch::syntax),
    help("lines look like `database: service [STATUS=action] service`")
)]
pub struct NsswitchParseError {
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
}

/// A parse failure located relative to the start of the whole text.
struct Located {
    message: String,
    start: usize,
    len: usize,
}

impl Located {
    fn new(message: impl Into<String>, start: usize, len: usize) -> Self {
        Located {
            message: message.into(),
            start,
            len: len.max(1),
        }
    }

    fn into_error(self, name: &str, text: &str) -> NsswitchParseError {
        NsswitchParseError {
            message: self.message,
            src: NamedSource::new(name, text.to_string()),
            span: (self.start, self.len).into(),
        }
    }
}

/// Parse a whole configuration file into its database lines, in order.
///
/// Lines whose service list is empty are dropped, as if the database were
/// not configured.
pub fn parse_config(name: &str, text: &str) -> Result<Vec<Database>, NsswitchParseError> {
    let mut databases = Vec::new();
    let mut offset = 0;

    for raw_line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += raw_line.len();

        let line = strip_comment(raw_line.trim_end_matches(['\n', '\r']));
        if line.trim().is_empty() {
            continue;
        }

        let Some(colon) = line.find(':') else {
            let lead = line.len() - line.trim_start().len();
            return Err(Located::new(
                "missing `:` after database name",
                line_start + lead,
                line.trim().len(),
            )
            .into_error(name, text));
        };

        let db_name = line[..colon].trim();
        if db_name.is_empty() {
            return Err(
                Located::new("missing database name", line_start, colon + 1).into_error(name, text)
            );
        }

        let services = parse_services_at(&line[colon + 1..], line_start + colon + 1)
            .map_err(|e| e.into_error(name, text))?;

        if services.is_empty() {
            tracing::debug!("ignoring `{}` with no services", db_name);
            continue;
        }

        databases.push(Database::new(db_name, services));
    }

    Ok(databases)
}

/// Parse a single service list such as `files [NOTFOUND=return] compat`.
pub fn parse_services(name: &str, text: &str) -> Result<Vec<ServiceSpec>, NsswitchParseError> {
    parse_services_at(text, 0).map_err(|e| e.into_error(name, text))
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_services_at(text: &str, base: usize) -> Result<Vec<ServiceSpec>, Located> {
    let mut services: Vec<ServiceSpec> = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            break;
        }

        if trimmed.starts_with('[') {
            let Some(close) = trimmed.find(']') else {
                return Err(Located::new("unterminated `[`", base + pos, trimmed.len()));
            };

            let Some(service) = services.last_mut() else {
                return Err(Located::new(
                    "action criteria must follow a service name",
                    base + pos,
                    close + 1,
                ));
            };

            apply_criteria(&trimmed[1..close], &mut service.actions)
                .map_err(|message| Located::new(message, base + pos, close + 1))?;

            pos += close + 1;
        } else {
            let end = trimmed
                .find(|c: char| c.is_whitespace() || c == '[')
                .unwrap_or(trimmed.len());
            let word = &trimmed[..end];

            if word.contains(']') {
                return Err(Located::new("unexpected `]`", base + pos, end));
            }

            services.push(ServiceSpec::new(word));
            pos += end;
        }
    }

    Ok(services)
}

fn apply_criteria(
    criteria: &str,
    actions: &mut crate::core::ActionTable,
) -> Result<(), String> {
    let mut any = false;

    for criterion in criteria.split_whitespace() {
        any = true;

        let (negated, criterion) = match criterion.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, criterion),
        };

        let Some((status, action)) = criterion.split_once('=') else {
            return Err(format!("expected `STATUS=action`, found `{}`", criterion));
        };

        let status = NssStatus::from_criterion(status)
            .ok_or_else(|| format!("unknown status `{}`", status))?;
        let action: Action = action.parse().map_err(|e| format!("{}", e))?;

        if negated {
            for other in [
                NssStatus::TryAgain,
                NssStatus::Unavail,
                NssStatus::NotFound,
                NssStatus::Success,
            ] {
                if other != status {
                    actions.set(other, action);
                }
            }
        } else {
            actions.set(status, action);
        }
    }

    if !any {
        return Err("empty action criteria".to_string());
    }

    Ok(())
}
