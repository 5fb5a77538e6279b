use crate::utils::error::{AcademicError, Result};

/// Configuration-level checks. Record-level rules live in `core::validator`.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(AcademicError::ConfigError {
            field: field_name.to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AcademicError::ConfigError {
            field: field_name.to_string(),
            message: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_name(field_name: &str, name: &str, extension: &str) -> Result<()> {
    validate_path(field_name, name)?;

    let has_extension = std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false);

    if !has_extension {
        return Err(AcademicError::ConfigError {
            field: field_name.to_string(),
            message: format!("File name '{}' must end in .{}", name, extension),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(AcademicError::ConfigError {
            field: field_name.to_string(),
            message: format!("Value {} must be at least {}", value, min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AcademicError::ConfigError {
            field: field_name.to_string(),
            message: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AcademicError::ConfigError {
            field: field_name.to_string(),
            message: format!("Value {} must be between {} and {}", value, min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("data.dir", "./data").is_ok());
        assert!(validate_path("data.dir", "   ").is_err());
        assert!(validate_path("data.dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("data.students_file", "students.json", "json").is_ok());
        assert!(validate_file_name("data.students_file", "students.txt", "json").is_err());
        assert!(validate_file_name("data.students_file", "students", "json").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("reports.top_n", 5, 1).is_ok());
        assert!(validate_positive_number("reports.top_n", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("demo.min_grades", 3, 1, 10).is_ok());
        assert!(validate_range("demo.min_grades", 11, 1, 10).is_err());
    }
}
