use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecitError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Invalid project file: {0}")]
    InvalidProject(String),

    #[error("Invalid characters file: {0}")]
    InvalidCharacters(String),

    #[error("Sequence not found: {0}")]
    SequenceNotFound(u64),

    #[error("No manuscripts found: {0}")]
    NoManuscriptsFound(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] recit_common::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RecitError>;
