use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnapshotError>;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid stream magic")]
    InvalidMagic,

    #[error("unsupported stream version {0}")]
    UnsupportedVersion(u16),

    #[error("invalid endianness tag {0}")]
    InvalidEndianness(u8),

    #[error("corrupt stream: {0}")]
    Corrupt(&'static str),

    #[error("unknown type tag {tag} in record {record}")]
    UnknownTypeTag { tag: u16, record: usize },

    #[error("no state variant registered for {0}")]
    UnsupportedType(&'static str),

    #[error("reference {id} cannot be resolved")]
    UnresolvedReference { id: i32 },

    #[error("invalid constructor parameters: {0}")]
    Construction(&'static str),
}
