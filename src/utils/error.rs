use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("failed to open serial port {port_name:?}: {source}")]
    SerialOpen {
        port_name: String,
        #[source]
        source: serialport::Error,
    },

    #[error("serial read failed: {0}")]
    SerialRead(#[source] io::Error),

    #[error("serial write failed: {0}")]
    SerialWrite(#[source] io::Error),

    #[error("stdin read failed: {0}")]
    Input(#[source] io::Error),

    #[error("output write failed: {0}")]
    Output(#[source] io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid config file {path:?}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("failed to install interrupt handler: {0}")]
    Interrupt(#[from] ctrlc::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;

impl RelayError {
    pub fn config(msg: impl Into<String>) -> Self {
        RelayError::Config(msg.into())
    }
}
