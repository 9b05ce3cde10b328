use thiserror::Error;

/// Failure taxonomy surfaced by the namespace index and the edit session.
///
/// Clone because single-flight refresh followers receive the owning caller's
/// outcome verbatim.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FsError {
    #[error("namespace not yet indexed (run `refresh`)")]
    NotIndexed,

    #[error("no such path: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error("read-only target: {0}")]
    ReadOnly(String),

    #[error(
        "write conflict: remote edited at {theirs}, last observed locally at {ours} (refresh and retry)"
    )]
    Conflict { ours: String, theirs: String },

    #[error("bad pattern: {0}")]
    Pattern(String),

    #[error("{0}")]
    Command(String),

    #[error("gateway: {0}")]
    Gateway(String),

    #[error("namespace invariant violated: {0}")]
    Invariant(String),

    #[error("no edit session in progress")]
    NotEditing,

    #[error("an edit session is already in progress for {0}")]
    AlreadyEditing(String),

    #[error("line {0} out of range (buffer has {1} lines)")]
    LineOutOfRange(usize, usize),
}

impl FsError {
    pub fn gateway(err: impl std::fmt::Display) -> Self {
        FsError::Gateway(err.to_string())
    }
}
