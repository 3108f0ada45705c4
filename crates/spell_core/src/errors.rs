use thiserror::Error;

/// Coarse classification of every [`SpellError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad sizing or construction inputs.
    InvalidParameter,
    /// A persisted filter whose bytes do not describe a valid CCBF container.
    Format,
    /// Filesystem failure, including truncated input.
    Io,
}

#[derive(Debug, Error)]
pub enum SpellError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Persist: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("bad magic {0:02x?}, expected \"CCBF\"")]
    BadMagic([u8; 4]),

    #[error("unsupported version {0}")]
    UnsupportedVersion(u16),

    #[error("corrupt filter: {0}")]
    Corrupt(String),
}

impl SpellError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SpellError::InvalidParameter(msg.into())
    }

    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        SpellError::Corrupt(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SpellError::Io(_) | SpellError::Persist(_) => ErrorKind::Io,
            SpellError::InvalidParameter(_) | SpellError::Json(_) => ErrorKind::InvalidParameter,
            SpellError::BadMagic(_) | SpellError::UnsupportedVersion(_) | SpellError::Corrupt(_) => {
                ErrorKind::Format
            }
        }
    }

    pub fn is_format_error(&self) -> bool {
        self.kind() == ErrorKind::Format
    }
}

pub type Result<T> = std::result::Result<T, SpellError>;
