pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid JSON format for Terraform plan: {message}")]
    Parse { message: String },

    #[error("No plan has been analyzed yet. Please run analyze first.")]
    NoAnalysis,

    #[error("Invalid config override: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    pub(crate) fn parse(message: impl std::fmt::Display) -> Self {
        Self::Parse {
            message: message.to_string(),
        }
    }
}
