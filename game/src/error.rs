use core::ffi::CStr;

use thiserror::Error;

/// Codes shown on the crash screen.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    UnknownGameState = 0x01,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("unknown game state: {0:#04x}")]
    UnknownGameState(u8),
}

impl GameError {
    pub const fn code(&self) -> ErrorCode {
        match self {
            GameError::UnknownGameState(_) => ErrorCode::UnknownGameState,
        }
    }

    /// Everything the crash screen needs. Strings are NUL-terminated so the
    /// console's crash handler can print them as-is.
    pub const fn report(&self) -> CrashReport {
        match *self {
            GameError::UnknownGameState(value) => CrashReport {
                code: ErrorCode::UnknownGameState,
                explanation: c"The main loop found a game state it does not know how to run.",
                label: c"gameState value",
                value,
            },
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CrashReport {
    pub code: ErrorCode,
    pub explanation: &'static CStr,
    pub label: &'static CStr,
    pub value: u8,
}
