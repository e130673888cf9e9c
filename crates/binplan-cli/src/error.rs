use binplan::engine::config::ConfigError;
use binplan::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The merged settings were rejected by the planning engine.
    #[error("Invalid plan configuration: {0}")]
    Plan(#[from] ConfigError),

    /// The settings could not be merged (conflicting or missing keys, bad overrides).
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write '{path}': {source}", path = path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub(crate) fn output(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        CliError::Output {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binplan::core::models::well::WellCoordinate;

    #[test]
    fn engine_errors_are_shown_unchanged() {
        let well: WellCoordinate = "B3".parse().unwrap();
        let engine = EngineError::MissingDiscreteValue { well };
        let expected = engine.to_string();
        assert_eq!(CliError::from(engine).to_string(), expected);
    }

    #[test]
    fn plan_configuration_errors_keep_their_type() {
        let err = CliError::from(ConfigError::MissingParameter("policy"));
        assert!(matches!(
            err,
            CliError::Plan(ConfigError::MissingParameter("policy"))
        ));
        assert!(err.to_string().starts_with("Invalid plan configuration:"));
    }

    #[test]
    fn output_errors_name_the_file() {
        let err = CliError::output(
            "out/plan.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        );
        let message = err.to_string();
        assert!(message.contains("out/plan.csv"));
        assert!(message.contains("no such directory"));
    }
}
