//! Dispatcher configuration.
//!
//! Settings are read once at startup and passed explicitly into the
//! [`crate::GuardChain`]; nothing here is global or mutable after construction.

/// Options consumed by the guard chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Include raw diagnostic text (`exceptionStr`) in failure responses.
    pub debug: bool,
}

impl DispatchConfig {
    pub fn debug() -> Self {
        DispatchConfig { debug: true }
    }

    pub fn production() -> Self {
        DispatchConfig { debug: false }
    }
}
