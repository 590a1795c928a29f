use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("-{0} flag has to be specified")]
    MissingFlag(&'static str),

    #[error("Operation {0} not allowed!")]
    UnknownOperation(String),

    #[error("Invalid user JSON: {0}")]
    InvalidItem(#[source] serde_json::Error),

    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File {path} is empty")]
    Empty { path: PathBuf },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Item with {0} not found")]
    NotFound(String),

    #[error("Failed to serialize users: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write users to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl StoreError {
    /// Data-path failures that are reported on the output sink instead of
    /// aborting the invocation.
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            StoreError::Open { .. }
                | StoreError::Empty { .. }
                | StoreError::Parse { .. }
                | StoreError::NotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
