use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlgaeError {
    #[error("Remote request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to publish output file: {0}")]
    PersistError(#[from] tempfile::PersistError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unknown species: {species}")]
    UnknownSpecies { species: String },

    #[error("Invalid profile for {species}: {field} = {value} (must be finite and > 0)")]
    InvalidProfile {
        species: String,
        field: String,
        value: f64,
    },

    #[error("Input table is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: unparseable month '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("Month {date} appears more than once in the input")]
    DuplicateMonth { date: String },

    #[error("Input table contains no data rows")]
    EmptyInput,

    #[error("Remote source returned HTTP {status}: {detail}")]
    RemoteStatus { status: u16, detail: String },

    #[error("Unexpected remote payload: {message}")]
    UnexpectedPayload { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    InputData,
    Acquisition,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlgaeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AlgaeError::ConfigError { .. }
            | AlgaeError::InvalidConfigValueError { .. }
            | AlgaeError::MissingConfigError { .. }
            | AlgaeError::UnknownSpecies { .. }
            | AlgaeError::InvalidProfile { .. } => ErrorCategory::Configuration,
            AlgaeError::CsvError(_)
            | AlgaeError::MissingColumn { .. }
            | AlgaeError::InvalidValue { .. }
            | AlgaeError::InvalidDate { .. }
            | AlgaeError::DuplicateMonth { .. }
            | AlgaeError::EmptyInput => ErrorCategory::InputData,
            AlgaeError::HttpError(_)
            | AlgaeError::RemoteStatus { .. }
            | AlgaeError::UnexpectedPayload { .. }
            | AlgaeError::SerializationError(_) => ErrorCategory::Acquisition,
            AlgaeError::IoError(_) | AlgaeError::PersistError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // transient on the remote side, a rerun may succeed
            AlgaeError::HttpError(_) => ErrorSeverity::Medium,
            AlgaeError::RemoteStatus { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            AlgaeError::IoError(_) | AlgaeError::PersistError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the configuration file and species profiles (tolerances must be > 0)"
            }
            ErrorCategory::InputData => {
                "Check the climate table: required columns, numeric values and YYYY-MON month keys"
            }
            ErrorCategory::Acquisition => {
                "Check network access and the request parameters, then rerun the download"
            }
            ErrorCategory::Storage => "Check that the output directory exists and is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::InputData => format!("Climate input rejected: {}", self),
            ErrorCategory::Acquisition => format!("Climate download failed: {}", self),
            ErrorCategory::Storage => format!("Could not write results: {}", self),
        }
    }

    /// Process exit code for a failed run.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, AlgaeError>;
