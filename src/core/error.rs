use thiserror::Error;

#[derive(Error, Debug)]
pub enum RheaError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Decision requested on a terminal state")]
    TerminalState,

    #[error("No legal actions available{}", unit_suffix(.unit))]
    NoLegalActions { unit: Option<usize> },

    #[error("State copy failed: {0}")]
    StateCopy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

fn unit_suffix(unit: &Option<usize>) -> String {
    match unit {
        Some(i) => format!(" for unit {}", i),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, RheaError>;
