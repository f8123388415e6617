//! CLI command implementations
//!
//! Each command returns a process exit code: 0 success, 2 configuration
//! error, 4 store connection error, 5 fatal error.

pub mod init;
pub mod serve;
pub mod validate;

/// Process exit codes
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
    pub const CONNECTION_ERROR: i32 = 4;
    pub const FATAL: i32 = 5;
}
