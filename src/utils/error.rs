use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcademicError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Duplicate key in {entity} repository: {id}")]
    DuplicateKey { entity: String, id: String },

    #[error("Student {student_id} is already enrolled in {course_code}")]
    AlreadyEnrolled {
        student_id: String,
        course_code: String,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Grade {value} is out of range (must be between 0 and 10)")]
    OutOfRange { value: f64 },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Domain,
    Input,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AcademicError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn duplicate_key(entity: &str, id: &str) -> Self {
        Self::DuplicateKey {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn invalid_input(field: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. }
            | Self::DuplicateKey { .. }
            | Self::AlreadyEnrolled { .. }
            | Self::NotFound { .. }
            | Self::OutOfRange { .. } => ErrorCategory::Domain,
            Self::InvalidInput { .. } => ErrorCategory::Input,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::Storage
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Domain | ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { entity, id } => format!("No {} with identifier '{}' exists.", entity.to_lowercase(), id),
            Self::DuplicateKey { entity, id } => {
                format!("A {} with identifier '{}' already exists.", entity.to_lowercase(), id)
            }
            Self::IoError(e) => format!("Could not access the data files: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "Check the birth date and the other values entered",
            Self::DuplicateKey { .. } => "Use a different identifier or look up the existing record",
            Self::AlreadyEnrolled { .. } => "Record grades on the existing enrollment instead",
            Self::NotFound { .. } => "List the existing records and retry with a known identifier",
            Self::OutOfRange { .. } => "Enter a grade between 0 and 10",
            Self::InvalidInput { .. } => "Re-enter the value in the expected format",
            Self::ConfigError { .. } => "Fix the configuration file or the command-line overrides",
            Self::IoError(_) => "Make sure the data directory exists and is writable",
            Self::SerializationError(_) => "Remove or repair the corrupted JSON snapshot files",
            Self::CsvError(_) => "Make sure the export directory is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, AcademicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_medium_severity() {
        let err = AcademicError::not_found("Student", "E-404");
        assert_eq!(err.category(), ErrorCategory::Domain);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "Student not found: E-404");
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err: AcademicError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_friendly_message_for_duplicates() {
        let err = AcademicError::duplicate_key("Course", "CS-101");
        assert_eq!(
            err.user_friendly_message(),
            "A course with identifier 'CS-101' already exists."
        );
    }
}
