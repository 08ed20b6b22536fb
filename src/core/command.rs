use std::fmt;
use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use crate::core::library::LibraryError;

#[derive(Debug)]
pub enum CommandError {
    NotFound {
        message: String,
    },
    DuplicateKey {
        message: String,
    },
    Storage {
        message: String,
        reason_code: Option<String>,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            LibraryError::DuplicateKey { message } => {
                CommandError::DuplicateKey { message }
            }
            LibraryError::StorageUnavailable { message, reason_code } => {
                CommandError::Storage { message, reason_code }
            }
            LibraryError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            LibraryError::Serialization { message } => {
                CommandError::Serialization { message }
            }
        }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(other: serde_json::Error) -> Self {
        CommandError::from(LibraryError::from(other))
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NotFound { message } => write!(f, "not found: {}", message),
            CommandError::DuplicateKey { message } => write!(f, "duplicate key: {}", message),
            CommandError::Storage { message, reason_code } => {
                write!(f, "storage unavailable: {} {:?}", message, reason_code)
            }
            CommandError::Validation { message, reason_code } => {
                write!(f, "validation: {} {:?}", message, reason_code)
            }
            CommandError::Serialization { message } => write!(f, "serialization: {}", message),
        }
    }
}
