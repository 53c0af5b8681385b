use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Credential must be {expected} bytes, got {actual}")]
    CredentialLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
