// SPDX-License-Identifier: MPL-2.0
//! Crate-wide error types.
//!
//! [`Error`] covers the fallible edges of the crate (configuration, state
//! persistence, engine lifecycle). Failures of the remote video source are
//! modeled separately by [`SourceError`](crate::application::port::SourceError)
//! because most of them are absorbed inside the engine.

use crate::application::port::SourceError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("State Error: {0}")]
    State(String),

    #[error("Source Error: {0}")]
    Source(#[from] SourceError),

    /// The query was blank after trimming.
    #[error("Invalid query: {0:?}")]
    InvalidQuery(String),

    /// A command was sent to an engine that has already shut down.
    #[error("Feed engine is stopped")]
    EngineStopped,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<ciborium::de::Error<std::io::Error>> for Error {
    fn from(err: ciborium::de::Error<std::io::Error>) -> Self {
        Error::State(err.to_string())
    }
}

impl From<ciborium::ser::Error<std::io::Error>> for Error {
    fn from(err: ciborium::ser::Error<std::io::Error>) -> Self {
        Error::State(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
