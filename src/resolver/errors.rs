//! Resolution error types and diagnostics.

use std::io;

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error during group resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("out of memory allocating the group buffer")]
    OutOfMemory,

    #[error("failed to install {count} supplementary group(s)")]
    Install {
        count: usize,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::OutOfMemory => Diagnostic::error("out of memory allocating the group buffer")
                .with_suggestion("Request a smaller capacity with `-n`"),

            ResolveError::Install { count, source } => {
                let mut diag = Diagnostic::error(format!(
                    "could not install {} supplementary group(s)",
                    count
                ))
                .with_context(format!("setgroups: {}", source));

                if source.raw_os_error() == Some(libc::EPERM) {
                    diag = diag
                        .with_suggestion("Run as root or with CAP_SETGID")
                        .with_suggestion("Use `grpresolve init --dry-run` to preview the result");
                } else {
                    diag = diag.with_suggestion("Check the kernel's NGROUPS_MAX setting");
                }

                diag
            }
        }
    }
}
