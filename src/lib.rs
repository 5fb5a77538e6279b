pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, ReportKind};

pub use adapters::storage::LocalStorage;
pub use config::AppConfig;
pub use core::{
    manager::{EnrollmentManager, Registry},
    repository::Repository,
    snapshot::SnapshotStore,
    validator::{Rule, RuleSet, Validatable, Validator},
};
pub use domain::model::{Course, Enrollment, EnrollmentStatus, Professor, Role, Student};
pub use utils::error::{AcademicError, Result};
