use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading a content dataset
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to fetch dataset from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read dataset file {path}: {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset {name}: {source}")]
    ParseFailed {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid dataset URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors that can occur when loading or persisting a field mapping
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read mapping file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write mapping file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse mapping JSON in {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize mapping: {0}")]
    SerializeFailed(#[from] serde_json::Error),

    #[error("Mapping refers to unknown iTunes tag key '{key}'")]
    UnknownMappingKey { key: String },
}

/// Errors that can occur while resolving file references during rendering
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("File URI '{uri}' uses an unsupported scheme")]
    UnsupportedFileUri { uri: String },

    #[error("Failed to build absolute URL for file URI '{uri}': {source}")]
    InvalidFileUrl {
        uri: String,
        #[source]
        source: url::ParseError,
    },
}

/// Top-level errors for feed generation
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Dataset error: {0}")]
    Source(#[from] SourceError),

    #[error("Mapping error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to write feed to {path}: {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
