use crate::core::manager::Registry;
use crate::utils::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct StudentRow<'a> {
    id: &'a str,
    full_name: String,
    program: &'a str,
    enrollment_number: &'a str,
}

#[derive(Serialize)]
struct ProfessorRow<'a> {
    id: &'a str,
    full_name: String,
    department: &'a str,
    salary: f64,
}

#[derive(Serialize)]
struct CourseRow<'a> {
    code: &'a str,
    name: &'a str,
    credits: u32,
    professor: String,
}

/// Writes `students.csv`, `professors.csv` and `courses.csv` into `dir`.
pub fn export_csv(registry: &Registry, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let students_path = dir.join("students.csv");
    let mut writer = csv::Writer::from_path(&students_path)?;
    for s in registry.students.all_values() {
        writer.serialize(StudentRow {
            id: s.person.id(),
            full_name: s.person.full_name(),
            program: &s.program,
            enrollment_number: &s.enrollment_number,
        })?;
    }
    writer.flush()?;

    let professors_path = dir.join("professors.csv");
    let mut writer = csv::Writer::from_path(&professors_path)?;
    for p in registry.professors.all_values() {
        writer.serialize(ProfessorRow {
            id: p.person.id(),
            full_name: p.person.full_name(),
            department: &p.department,
            salary: p.salary,
        })?;
    }
    writer.flush()?;

    let courses_path = dir.join("courses.csv");
    let mut writer = csv::Writer::from_path(&courses_path)?;
    for c in registry.courses.all_values() {
        writer.serialize(CourseRow {
            code: &c.code,
            name: &c.name,
            credits: c.credits,
            professor: registry
                .professor_name(c)
                .unwrap_or_else(|| "N/A".to_string()),
        })?;
    }
    writer.flush()?;

    tracing::info!("CSV export written to {}", dir.display());
    Ok(vec![students_path, professors_path, courses_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Course, Student};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_headers_and_rows() {
        let mut registry = Registry::new();
        registry
            .students
            .add(
                Student::new(
                    "E-001",
                    "Ana",
                    "Gomez",
                    NaiveDate::from_ymd_opt(2005, 1, 1).unwrap(),
                    "Software",
                    "2024-0001",
                )
                .unwrap(),
            )
            .unwrap();
        registry
            .courses
            .add(Course::new("CS-101", "Programming I", 4).with_professor("P-404"))
            .unwrap();

        let temp_dir = TempDir::new().unwrap();
        let paths = export_csv(&registry, temp_dir.path()).unwrap();
        assert_eq!(paths.len(), 3);

        let students = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(students.starts_with("id,full_name,program,enrollment_number"));
        assert!(students.contains("E-001,Ana Gomez,Software,2024-0001"));

        let courses = std::fs::read_to_string(&paths[2]).unwrap();
        assert!(courses.contains("CS-101,Programming I,4,N/A"));

        // csv writes the header with the first record
        let professors = std::fs::read_to_string(&paths[1]).unwrap();
        assert_eq!(professors.lines().count(), 0);
    }
}
