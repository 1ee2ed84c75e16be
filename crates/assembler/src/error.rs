use snippet_backend::BackendError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssemblerError>;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Lambda at offset {source_start} has no `=>` arrow")]
    MalformedLambda { source_start: usize },

    #[error("The document is already finalized; call clear() to start a new cycle")]
    AlreadyFinalized,

    #[error("The document has not been finalized yet")]
    NotFinalized,

    #[error(transparent)]
    Backend(#[from] BackendError),
}
