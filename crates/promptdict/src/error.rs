use thiserror::Error;

/// Broad classes of failure, used by clients to decide how to react.
///
/// Only [`ErrorKind::MalformedInput`] and [`ErrorKind::ResourceUnavailable`] are expected
/// during normal operation; stale references inside diffs and import payloads are
/// skipped by the engine and never surface as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    MissingReference,
    ResourceUnavailable,
    Conflict,
    Storage,
}

#[derive(Error, Debug)]
pub enum PromptDictError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Baseline parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] confique::Error),

    #[error("Baseline unavailable: {0}")]
    BaselineUnavailable(String),

    #[error("Unrecognized import payload: {0}")]
    InvalidPayload(String),

    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    #[error("Moving folder {folder} under {parent} would create a cycle")]
    FolderCycle { folder: String, parent: String },

    #[error("Store error: {0}")]
    Store(String),
}

impl PromptDictError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PromptDictError::Serialization(_)
            | PromptDictError::Yaml(_)
            | PromptDictError::Config(_)
            | PromptDictError::InvalidPayload(_) => ErrorKind::MalformedInput,
            PromptDictError::CategoryNotFound(_)
            | PromptDictError::GroupNotFound(_)
            | PromptDictError::TagNotFound(_)
            | PromptDictError::FolderNotFound(_)
            | PromptDictError::PresetNotFound(_) => ErrorKind::MissingReference,
            PromptDictError::BaselineUnavailable(_) => ErrorKind::ResourceUnavailable,
            PromptDictError::DuplicateName { .. } | PromptDictError::FolderCycle { .. } => {
                ErrorKind::Conflict
            }
            PromptDictError::Io(_) | PromptDictError::Store(_) => ErrorKind::Storage,
        }
    }
}

pub type Result<T> = std::result::Result<T, PromptDictError>;
