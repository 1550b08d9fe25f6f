//! Exit codes returned by [`crate::run`].

/// Success exit code (standard Unix convention).
pub const SUCCESS: i32 = 0;

/// Usage, configuration, input and runtime errors.
pub const ERROR: i32 = 2;
