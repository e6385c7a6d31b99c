// src/exit.rs
//! Standardized process exit codes for `retrofix`.
//!
//! Drift and per-file I/O failures never change the exit status; only the
//! driver's own setup errors and failed sentinel checks do.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum RetrofixExit {
    /// Run completed (possibly with warnings).
    Success = 0,
    /// Generic error (config, unreadable patch directory, broken descriptor).
    Error = 1,
    /// Command line or descriptor input was invalid.
    InvalidInput = 2,
    /// At least one sentinel check failed.
    CheckFailed = 6,
}

impl RetrofixExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl Termination for RetrofixExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(RetrofixExit::Success.code(), 0);
        assert_eq!(RetrofixExit::Error.code(), 1);
        assert_eq!(RetrofixExit::InvalidInput.code(), 2);
        assert_eq!(RetrofixExit::CheckFailed.code(), 6);
    }
}
