//! Exit codes following sysexits.h conventions.
//!
//! These codes let scripts tell "no message in this image" apart from "the
//! file could not be read" without parsing stderr.

use pixveil_core::StegoError;

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Command line usage error (invalid arguments).
/// Maps to EX_USAGE from sysexits.h.
pub const USAGE_ERROR: i32 = 64;

/// Data error: no hidden message, wrong password, message too large.
/// Maps to EX_DATAERR from sysexits.h.
pub const DATA_ERROR: i32 = 65;

/// Cannot open or decode the input image.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// I/O error (cannot write output file).
/// Maps to EX_IOERR from sysexits.h.
pub const IO_ERROR: i32 = 74;

/// Represents an exit code with optional error context.
#[derive(Debug)]
pub struct ExitCode {
    pub code: i32,
    pub message: Option<String>,
}

impl ExitCode {
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        let stego = err.chain().find_map(|e| e.downcast_ref::<StegoError>());
        let code = match stego {
            Some(e) if e.is_recoverable() => DATA_ERROR,
            Some(StegoError::InvalidInput(_)) => USAGE_ERROR,
            Some(_) => DATA_ERROR,
            None => classify_message(&message),
        };

        Self {
            code,
            message: Some(message),
        }
    }
}

fn classify_message(message: &str) -> i32 {
    if message.contains("Failed to read image") || message.contains("Failed to read config") {
        INPUT_ERROR
    } else if message.contains("Failed to write") {
        IO_ERROR
    } else if message.contains("Invalid size") || message.contains("Invalid config") {
        USAGE_ERROR
    } else if message.contains("No hidden message") || message.contains("could not be decrypted") {
        DATA_ERROR
    } else {
        GENERAL_ERROR
    }
}
