//! Calling one configured service.

use crate::core::{GroupBuffer, NssStatus};
use crate::resolver::engine::ChainEntry;
use crate::sources::{compat_call, GroupRequest};

/// Run one chain entry and return its normalized status.
///
/// Sources without a native group-list operation, and service names with no
/// registered source, go through the enumeration fallback. A status outside
/// the defined set aborts the process.
pub fn invoke(entry: &ChainEntry, request: &GroupRequest<'_>, groups: &mut GroupBuffer) -> NssStatus {
    let lookup = match entry.source.as_deref() {
        Some(source) => match source.initgroups_dyn(request, groups) {
            Some(lookup) => lookup,
            None => compat_call(Some(source), request, groups),
        },
        None => compat_call(None, request, groups),
    };

    if let Some(errno) = lookup.errno {
        tracing::debug!(
            "service `{}` reported: {}",
            entry.spec.name,
            std::io::Error::from_raw_os_error(errno)
        );
    }

    match NssStatus::try_from(lookup.status) {
        Ok(status) => status,
        Err(raw) => fatal(&format!(
            "illegal status {} from service `{}` while listing groups",
            raw.0, entry.spec.name
        )),
    }
}

/// Report an internal consistency violation and abort.
pub fn fatal(message: &str) -> ! {
    tracing::error!("{}", message);
    eprintln!("fatal: {}", message);
    std::process::abort()
}
