//! Process exit codes.

/// Success exit code (standard Unix convention).
pub const SUCCESS: i32 = 0;

/// Any failure: bad arguments, bad configuration, or an arena that refused to start.
pub const ERROR: i32 = 2;
