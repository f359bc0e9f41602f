use thiserror::Error;

#[derive(Error, Debug)]
pub enum AstroError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Column '{column}' not found in input (available: {available})")]
    MissingColumnError { column: String, available: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Io,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AstroError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AstroError::ConfigError { .. }
            | AstroError::ConfigValidationError { .. }
            | AstroError::InvalidConfigValueError { .. }
            | AstroError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AstroError::CsvError(_)
            | AstroError::MissingColumnError { .. }
            | AstroError::ProcessingError { .. } => ErrorCategory::Data,
            AstroError::IoError(_) | AstroError::ZipError(_) => ErrorCategory::Io,
            AstroError::SerializationError(_) => ErrorCategory::Serialization,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            // 暫時性的檔案系統問題，可重試
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Serialization => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AstroError::MissingColumnError { column, .. } => format!(
                "Check the header row, or pass --dob-column with one of the listed columns instead of '{}'",
                column
            ),
            AstroError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            AstroError::InvalidConfigValueError { field, .. }
            | AstroError::ConfigValidationError { field, .. } => {
                format!("Fix '{}' in the configuration and run again", field)
            }
            AstroError::ConfigError { .. } => {
                "Check the configuration file syntax".to_string()
            }
            AstroError::CsvError(_) => {
                "Check the input delimiter and header settings".to_string()
            }
            AstroError::IoError(_) | AstroError::ZipError(_) => {
                "Check that the input exists and the output path is writable".to_string()
            }
            AstroError::SerializationError(_) | AstroError::ProcessingError { .. } => {
                "Run again with --verbose and report the log".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Input data problem: {}", self),
            ErrorCategory::Io => format!("File access problem: {}", self),
            ErrorCategory::Serialization => format!("Internal output problem: {}", self),
        }
    }

    /// 依嚴重程度對應的程序結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, AstroError>;
