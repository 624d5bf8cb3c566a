//! Crate error type

/// Errors surfaced by the wire codec, the remote physics transport and the
/// native server.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Body could not be parsed as the expected JSON shape
    #[error("malformed payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// Value could not be serialized
    #[error("could not encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// Network or fetch failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Endpoint answered with a non-success status
    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    /// Configuration could not be loaded
    #[cfg(not(target_arch = "wasm32"))]
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(not(target_arch = "wasm32"))]
impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self {
        Error::Config(Box::new(e))
    }
}

/// Crate result alias
pub type Result<T> = std::result::Result<T, Error>;
