use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Stored password could not be decrypted")]
    Decryption,
}

pub type Result<T> = std::result::Result<T, Error>;
