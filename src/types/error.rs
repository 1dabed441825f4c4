use anyhow::Error;
use thiserror::Error;

/// Application-level error categories for s3kit.
///
/// These represent the failures a user can act on: a missing bucket or
/// directory, a permission problem, missing credentials, a failed remote
/// call, a rename collision, or a local I/O failure.
///
/// ## Exit Codes
///
/// Each variant maps to an exit code (via `exit_code()`):
/// - 1: Runtime errors (everything except configuration)
/// - 2: Configuration errors (InvalidConfig)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum S3kitError {
    /// Target bucket or directory does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Target path exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Permission denied by the object store.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// No usable identity for the remote API.
    #[error("AWS credentials not found. Please configure your AWS credentials.")]
    CredentialsMissing,

    /// Any other remote-call failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Rename target already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Local read/write/rename failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid configuration or arguments.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl S3kitError {
    /// Get the appropriate process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            S3kitError::InvalidConfig(_) => 2,
            _ => 1,
        }
    }

    /// The message shown to users, without the category prefix.
    pub fn message(&self) -> String {
        match self {
            S3kitError::NotFound(message)
            | S3kitError::NotADirectory(message)
            | S3kitError::AccessDenied(message)
            | S3kitError::Transport(message)
            | S3kitError::AlreadyExists(message)
            | S3kitError::Io(message)
            | S3kitError::InvalidConfig(message) => message.clone(),
            S3kitError::CredentialsMissing => self.to_string(),
        }
    }
}

/// Extract the exit code from an anyhow::Error, defaulting to 1.
pub fn exit_code_from_error(e: &Error) -> i32 {
    find_s3kit_error(e).map_or(1, S3kitError::exit_code)
}

/// The line printed after `Error: ` when a tool fails.
pub fn user_facing_message(e: &Error) -> String {
    match find_s3kit_error(e) {
        Some(err) => err.message(),
        None => format!("{e:#}"),
    }
}

/// Find the categorized error inside an anyhow::Error chain, if any.
pub fn find_s3kit_error(e: &Error) -> Option<&S3kitError> {
    e.chain().find_map(|cause| cause.downcast_ref::<S3kitError>())
}
