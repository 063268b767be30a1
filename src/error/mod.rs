//! Centralized error handling
//! Defines the crate error type and result alias

use std::fmt;

/// Category of the error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File system or I/O errors
    Io,
    /// Terminal backend errors
    Terminal,
    /// Allocation failure during buffer growth
    OutOfMemory,
    /// Internal logic or invariant violations
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "IO"),
            Self::Terminal => write!(f, "Terminal"),
            Self::OutOfMemory => write!(f, "OutOfMemory"),
            Self::Internal => write!(f, "Internal"),
        }
    }
}

/// A structured editor error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// What kind of error occurred
    pub kind: ErrorKind,
    /// Human-readable description
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a terminal backend error
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Terminal, message)
    }

    /// Shorthand for an allocation failure
    pub fn out_of_memory(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OutOfMemory, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err.to_string())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

/// Result alias for editor operations
pub type Result<T> = std::result::Result<T, Error>;
