//! Backend lookup outcomes and the per-outcome actions configured for them.

use std::fmt;

/// The status a backend reports, exactly as it returned it.
///
/// Backends are free to return any integer; only the five values covered
/// by [`NssStatus`] are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawStatus(pub i32);

impl From<NssStatus> for RawStatus {
    fn from(status: NssStatus) -> Self {
        RawStatus(status as i32)
    }
}

/// Outcome of one backend invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum NssStatus {
    /// Temporary failure; the backend may succeed later.
    TryAgain = -2,
    /// The backend could not be used at all.
    Unavail = -1,
    /// The backend has no data for this user.
    NotFound = 0,
    /// The backend answered.
    Success = 1,
    /// The backend asks the caller to stop.
    Return = 2,
}

impl NssStatus {
    /// Every defined status, in numeric order.
    pub const ALL: [NssStatus; 5] = [
        NssStatus::TryAgain,
        NssStatus::Unavail,
        NssStatus::NotFound,
        NssStatus::Success,
        NssStatus::Return,
    ];

    fn index(self) -> usize {
        (self as i32 + 2) as usize
    }

    /// Parse a status name as it appears inside `[...]` in nsswitch.conf.
    ///
    /// `RETURN` is internal and cannot be named there.
    pub fn from_criterion(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SUCCESS" => Some(NssStatus::Success),
            "NOTFOUND" => Some(NssStatus::NotFound),
            "UNAVAIL" => Some(NssStatus::Unavail),
            "TRYAGAIN" => Some(NssStatus::TryAgain),
            _ => None,
        }
    }
}

impl TryFrom<RawStatus> for NssStatus {
    type Error = RawStatus;

    fn try_from(raw: RawStatus) -> Result<Self, Self::Error> {
        match raw.0 {
            -2 => Ok(NssStatus::TryAgain),
            -1 => Ok(NssStatus::Unavail),
            0 => Ok(NssStatus::NotFound),
            1 => Ok(NssStatus::Success),
            2 => Ok(NssStatus::Return),
            _ => Err(raw),
        }
    }
}

impl fmt::Display for NssStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NssStatus::TryAgain => write!(f, "TRYAGAIN"),
            NssStatus::Unavail => write!(f, "UNAVAIL"),
            NssStatus::NotFound => write!(f, "NOTFOUND"),
            NssStatus::Success => write!(f, "SUCCESS"),
            NssStatus::Return => write!(f, "RETURN"),
        }
    }
}

/// What to do after a backend reports a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Consult the next backend.
    Continue,
    /// Stop walking the chain.
    Return,
    /// Merge with the next backend's answer. Never stops a group-list walk.
    Merge,
}

impl std::str::FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continue" => Ok(Action::Continue),
            "return" => Ok(Action::Return),
            "merge" => Ok(Action::Merge),
            _ => Err(ActionParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Continue => write!(f, "continue"),
            Action::Return => write!(f, "return"),
            Action::Merge => write!(f, "merge"),
        }
    }
}

/// Error returned when parsing an invalid action.
#[derive(Debug, Clone)]
pub struct ActionParseError(pub String);

impl fmt::Display for ActionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid action '{}', valid values: return, continue, merge",
            self.0
        )
    }
}

impl std::error::Error for ActionParseError {}

/// The action configured for each status of one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTable {
    actions: [Action; 5],
}

impl Default for ActionTable {
    fn default() -> Self {
        ActionTable {
            actions: [
                Action::Continue, // TRYAGAIN
                Action::Continue, // UNAVAIL
                Action::Continue, // NOTFOUND
                Action::Return,   // SUCCESS
                Action::Return,   // RETURN
            ],
        }
    }
}

impl ActionTable {
    /// The action for a status.
    pub fn get(&self, status: NssStatus) -> Action {
        self.actions[status.index()]
    }

    /// Override the action for a status.
    pub fn set(&mut self, status: NssStatus, action: Action) {
        self.actions[status.index()] = action;
    }

    /// Statuses whose action differs from the default table.
    pub fn overrides(&self) -> Vec<(NssStatus, Action)> {
        let defaults = ActionTable::default();
        NssStatus::ALL
            .iter()
            .filter(|s| self.get(**s) != defaults.get(**s))
            .map(|s| (*s, self.get(*s)))
            .collect()
    }
}
