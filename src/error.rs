use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfiguratorError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Rules error: {0}")]
    Rules(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("{0} is an accessory and cannot be configured as a base system")]
    NotASystem(String),

    /// A pre-submission requirement is unmet; the message is shown to the visitor as-is.
    #[error("{0}")]
    MissingRequirement(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Contact error: {0}")]
    Contact(String),
}

impl From<ConfiguratorError> for String {
    fn from(err: ConfiguratorError) -> Self {
        err.to_string()
    }
}
