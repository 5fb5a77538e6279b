use crate::core::manager::DEFAULT_TOP_N;
use crate::core::snapshot::SnapshotFiles;
use crate::utils::error::{AcademicError, Result};
use crate::utils::validation::{
    validate_file_name, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub logging: LoggingConfig,
    pub demo: DemoConfig,
    pub reports: ReportsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: String,
    pub professors_file: String,
    pub students_file: String,
    pub courses_file: String,
    pub save_on_exit: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        let files = SnapshotFiles::default();
        Self {
            dir: "./data".to_string(),
            professors_file: files.professors,
            students_file: files.students,
            courses_file: files.courses,
            save_on_exit: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("academic_records.log".to_string()),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub seed: u64,
    pub enrollments_per_student: usize,
    pub min_grades: usize,
    pub max_grades: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 123,
            enrollments_per_student: 2,
            min_grades: 3,
            max_grades: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    pub top_n: usize,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl AppConfig {
    /// Loads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Falls back to defaults when the file does not exist.
    pub fn from_optional_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().is_file() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AcademicError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}` from the environment. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn snapshot_files(&self) -> SnapshotFiles {
        SnapshotFiles {
            professors: self.data.professors_file.clone(),
            students: self.data.students_file.clone(),
            courses: self.data.courses_file.clone(),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("data.dir", &self.data.dir)?;
        validate_file_name("data.professors_file", &self.data.professors_file, "json")?;
        validate_file_name("data.students_file", &self.data.students_file, "json")?;
        validate_file_name("data.courses_file", &self.data.courses_file, "json")?;

        validate_non_empty_string("logging.level", &self.logging.level)?;
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(AcademicError::ConfigError {
                field: "logging.level".to_string(),
                message: format!(
                    "Unsupported level '{}'. Valid levels: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            });
        }
        if let Some(file) = &self.logging.file {
            validate_path("logging.file", file)?;
        }

        validate_range(
            "demo.enrollments_per_student",
            self.demo.enrollments_per_student,
            1,
            10,
        )?;
        validate_positive_number("demo.min_grades", self.demo.min_grades, 1)?;
        validate_range(
            "demo.max_grades",
            self.demo.max_grades,
            self.demo.min_grades,
            20,
        )?;

        validate_positive_number("reports.top_n", self.reports.top_n, 1)?;
        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
