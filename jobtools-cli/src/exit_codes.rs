//! Process exit codes

pub const EXIT_SUCCESS: i32 = 0;
/// Any classified failure: binding, config, registry or the task itself
pub const EXIT_ERROR: i32 = 2;
