use thiserror::Error;

/// A malformed percent-escape: `%` not followed by two hex digits.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("malformed percent-escape at offset {offset}")]
pub struct DecodeError {
    /// Byte offset of the offending `%`.
    pub offset: usize,
}

#[derive(Error, Debug)]
pub enum CutilError {
    #[error("wrong # args: should be \"{command} {usage}\"")]
    WrongNumArgs {
        command: String,
        usage: &'static str,
    },

    #[error("{0}")]
    Argument(String),

    #[error("could not decode string.")]
    Decode(#[from] DecodeError),

    #[error("could not {action}: {reason}")]
    CryptoOperation {
        action: &'static str,
        reason: String,
    },

    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),
}

pub type Result<T> = std::result::Result<T, CutilError>;
