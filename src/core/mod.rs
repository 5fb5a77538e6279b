pub mod manager;
pub mod reports;
pub mod repository;
pub mod snapshot;
pub mod validator;

pub use crate::domain::model::{Course, Enrollment, EnrollmentStatus, Professor, Role, Student};
pub use crate::domain::ports::{Identifiable, Storage};
pub use crate::utils::error::Result;
