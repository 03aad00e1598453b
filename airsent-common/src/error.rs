use thiserror::Error;

/// Main error type for airsent
#[derive(Error, Debug)]
pub enum AirsentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No data available: {0}")]
    NoData(String),
}

impl From<toml::de::Error> for AirsentError {
    fn from(error: toml::de::Error) -> Self {
        AirsentError::Config(error.to_string())
    }
}

impl From<toml::ser::Error> for AirsentError {
    fn from(error: toml::ser::Error) -> Self {
        AirsentError::Config(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AirsentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_errors_become_config_errors() {
        let err: AirsentError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        assert!(matches!(err, AirsentError::Config(_)));
    }

    #[test]
    fn test_display_names_column() {
        let err = AirsentError::MissingColumn("tweet_coord".into());
        assert_eq!(err.to_string(), "Dataset is missing required column 'tweet_coord'");
    }
}
