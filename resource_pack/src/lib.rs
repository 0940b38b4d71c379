use thiserror::Error;

pub use config::{Compression, Options};
pub use container::{Overlay, ResourceContainer};
pub use key::Key;
pub use writer::JsonWriter;

pub mod codec;
pub mod config;
pub mod container;
pub mod format;
pub mod key;
pub mod metadata;
pub mod overlay;
pub mod resource;
pub mod serialize;
pub mod tree;
pub mod writer;

#[derive(Error, Debug)]
pub enum Error {
    // delegated errors
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("Json error")]
    Json(#[from] serde_json::Error),

    // archive errors
    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),
    #[error("Unsupported compression method: {0}")]
    UnsupportedCompression(u16),
    #[error("Archive too large")]
    ArchiveTooLarge,
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    // writer errors
    #[error("Invalid writer state: {0}")]
    InvalidWriterState(&'static str),
    #[error("Non-finite number")]
    NonFiniteNumber,

    // model errors
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Invalid overlay directory: {0}")]
    InvalidOverlayDirectory(String),
    #[error("Malformed resource: {path}")]
    MalformedResource {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
