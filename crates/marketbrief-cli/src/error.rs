use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// Per-instrument data failures never surface here; they are contained
/// inside the report pipeline and leave the exit code at zero.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] marketbrief_core::ConfigError),

    #[error(transparent)]
    Catalog(#[from] marketbrief_core::CatalogError),

    #[error(transparent)]
    Validation(#[from] marketbrief_core::ValidationError),

    #[error("delivery failed: {0}")]
    Delivery(#[from] marketbrief_core::NotifyError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Catalog(_) | Self::Validation(_) => 2,
            Self::Delivery(_) | Self::Io(_) => 10,
        }
    }
}
