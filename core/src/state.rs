//! Row-local view state.
//!
//! Disclosure (collapsed/expanded) and fetch progress are independent: a row
//! can be expanded before its data arrives and shows an empty table until
//! the load settles.

/// Collapse/expand state of a run or attempt row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disclosure {
    #[default]
    Collapsed,
    Expanded,
}

impl Disclosure {
    /// Flip the state. Two toggles return to the original state.
    pub fn toggle(&mut self) {
        *self = match self {
            Disclosure::Collapsed => Disclosure::Expanded,
            Disclosure::Expanded => Disclosure::Collapsed,
        };
    }

    pub fn is_expanded(self) -> bool {
        matches!(self, Disclosure::Expanded)
    }
}

/// Progress of one row-owned fetch.
///
/// Failures are observable state, not silently swallowed: a failed load
/// renders its message instead of leaving the row empty forever.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Fold a fetch result into the state.
    pub fn settle<E: std::fmt::Display>(&mut self, result: Result<T, E>) {
        *self = match result {
            Ok(value) => LoadState::Ready(value),
            Err(e) => LoadState::Failed(e.to_string()),
        };
    }
}
