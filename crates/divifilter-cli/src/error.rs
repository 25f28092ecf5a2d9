use divifilter_core::{CoreError, ErrorKind};
use divifilter_warehouse::WarehouseError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Core(error) => match error.kind() {
                ErrorKind::InvalidArgument => 2,
                ErrorKind::Unavailable => 3,
            },
            Self::Command(_) => 2,
            Self::Warehouse(_) => 3,
            Self::Config(_) => 4,
            Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
