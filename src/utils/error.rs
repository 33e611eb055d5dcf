use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Interest rate is zero: the amortized total-cost formula is undefined")]
    ZeroInterestRate,

    #[error("Degenerate rate {annual_rate_percent}% over {months} months: formula denominator is zero")]
    DegenerateRate { annual_rate_percent: f64, months: u32 },

    #[error("Invalid input for '{field}' ({value}): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Domain,
    Input,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CalcError {
    pub fn invalid_input(field: &str, value: impl ToString, reason: &str) -> Self {
        CalcError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CalcError::ZeroInterestRate | CalcError::DegenerateRate { .. } => {
                ErrorCategory::Domain
            }
            CalcError::InvalidInput { .. } | CalcError::CsvError(_) => ErrorCategory::Input,
            CalcError::TomlError(_)
            | CalcError::ConfigError { .. }
            | CalcError::ConfigValidationError { .. }
            | CalcError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CalcError::IoError(_) | CalcError::SerializationError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Domain => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CalcError::ZeroInterestRate => {
                "A 0% loan costs exactly its principal; use a positive annual rate".to_string()
            }
            CalcError::DegenerateRate { .. } => {
                "The rate is too small to amortize in floating point; use a larger rate".to_string()
            }
            CalcError::InvalidInput { field, .. } => {
                format!("Check the '{}' value of the loan", field)
            }
            CalcError::CsvError(_) => {
                "Input CSV must have the header id,principal,annual_rate_percent,years".to_string()
            }
            CalcError::IoError(_) => "Check that the file exists and is accessible".to_string(),
            CalcError::SerializationError(_) => "Report this as a bug".to_string(),
            CalcError::TomlError(_) => "Make sure the config file is valid TOML".to_string(),
            CalcError::ConfigError { .. } | CalcError::ConfigValidationError { .. } => {
                "Review the batch configuration file".to_string()
            }
            CalcError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the configuration", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Domain => format!("Cannot compute loan cost: {}", self),
            ErrorCategory::Input => format!("Invalid loan data: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("File system error: {}", self),
        }
    }

    /// 依嚴重程度決定 CLI 退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
