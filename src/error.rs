use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("catalog request failed: {0}")]
    CatalogHttp(String),

    #[error("catalog returned status {status}: {message}")]
    CatalogStatus { status: u16, message: String },

    #[error("failed to parse catalog response: {0}")]
    CatalogParse(String),

    #[error("no '{language}' entry in localized label list")]
    LabelNotFound { language: String },

    #[error("catalog entry {0} carries no theme")]
    MissingTheme(String),

    #[error("asset request failed: {0}")]
    AssetHttp(String),

    #[error("asset returned status {status}: {message}")]
    AssetStatus { status: u16, message: String },

    #[error("unreadable archive: {0}")]
    Archive(String),

    #[error("failed to parse archive metadata member: {0}")]
    MetadataParse(String),

    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("failed to serialize manifest: {0}")]
    Serialize(String),

    #[error("store configuration error: {0}")]
    StoreConfig(String),

    #[error("store write failed: {0}")]
    StoreWrite(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
