use crate::domain::ports::Identifiable;
use crate::utils::error::{AcademicError, Result};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

pub const MIN_STUDENT_AGE: i32 = 15;
pub const MIN_PROFESSOR_AGE: i32 = 25;
pub const PASSING_GRADE: f64 = 7.0;
pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 10.0;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Student,
    Professor,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Professor => "Professor",
        }
    }
}

/// Fields shared by every member of the institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    // implied by the owning type, never read from a file
    #[serde(skip)]
    role: Role,
}

impl Person {
    fn new(id: &str, first_name: &str, last_name: &str, birth_date: NaiveDate, role: Role) -> Self {
        Self {
            id: id.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            birth_date,
            role,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Calendar-year difference, not day-precise.
    pub fn age(&self) -> i32 {
        self.age_in(Local::now().year())
    }

    pub fn age_in(&self, year: i32) -> i32 {
        year - self.birth_date.year()
    }

    fn ensure_min_age(&self, min_age: i32) -> Result<()> {
        let age = self.age();
        if age < min_age {
            return Err(AcademicError::validation(format!(
                "{} must be at least {} years old (got {})",
                self.role.label(),
                min_age,
                age
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} (Role: {})",
            self.id,
            self.first_name,
            self.last_name,
            self.role.label()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProfessorRecord")]
pub struct Professor {
    #[serde(flatten)]
    pub person: Person,
    pub department: String,
    pub salary: f64,
}

#[derive(Deserialize)]
struct ProfessorRecord {
    #[serde(flatten)]
    person: Person,
    department: String,
    #[serde(default)]
    salary: f64,
}

impl From<ProfessorRecord> for Professor {
    fn from(record: ProfessorRecord) -> Self {
        let mut person = record.person;
        person.role = Role::Professor;
        Self {
            person,
            department: record.department,
            salary: record.salary,
        }
    }
}

impl Professor {
    /// Fails when the professor is younger than 25. Salary is left at zero.
    pub fn new(
        id: &str,
        first_name: &str,
        last_name: &str,
        birth_date: NaiveDate,
        department: &str,
    ) -> Result<Self> {
        let person = Person::new(id, first_name, last_name, birth_date, Role::Professor);
        person.ensure_min_age(MIN_PROFESSOR_AGE)?;
        Ok(Self {
            person,
            department: department.to_string(),
            salary: 0.0,
        })
    }

    pub fn with_salary(mut self, salary: f64) -> Self {
        self.salary = salary;
        self
    }
}

impl Identifiable for Professor {
    const KIND: &'static str = "Professor";

    fn identifier(&self) -> &str {
        self.person.id()
    }
}

impl fmt::Display for Professor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.person.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StudentRecord")]
pub struct Student {
    #[serde(flatten)]
    pub person: Person,
    pub program: String,
    pub enrollment_number: String,
}

#[derive(Deserialize)]
struct StudentRecord {
    #[serde(flatten)]
    person: Person,
    program: String,
    enrollment_number: String,
}

impl From<StudentRecord> for Student {
    fn from(record: StudentRecord) -> Self {
        let mut person = record.person;
        person.role = Role::Student;
        Self {
            person,
            program: record.program,
            enrollment_number: record.enrollment_number,
        }
    }
}

impl Student {
    /// Fails when the student is younger than 15. The enrollment number format is not checked here.
    pub fn new(
        id: &str,
        first_name: &str,
        last_name: &str,
        birth_date: NaiveDate,
        program: &str,
        enrollment_number: &str,
    ) -> Result<Self> {
        let person = Person::new(id, first_name, last_name, birth_date, Role::Student);
        person.ensure_min_age(MIN_STUDENT_AGE)?;
        Ok(Self {
            person,
            program: program.to_string(),
            enrollment_number: enrollment_number.to_string(),
        })
    }
}

impl Identifiable for Student {
    const KIND: &'static str = "Student";

    fn identifier(&self) -> &str {
        self.person.id()
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.person.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub credits: u32,
    #[serde(default)]
    pub professor_id: Option<String>,
}

impl Course {
    pub fn new(code: &str, name: &str, credits: u32) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            credits,
            professor_id: None,
        }
    }

    pub fn with_professor(mut self, professor_id: &str) -> Self {
        self.professor_id = Some(professor_id.to_string());
        self
    }
}

impl Identifiable for Course {
    const KIND: &'static str = "Course";

    fn identifier(&self) -> &str {
        &self.code
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentStatus {
    InProgress,
    Passed,
    Failed,
}

impl EnrollmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EnrollmentStatus::InProgress => "In progress",
            EnrollmentStatus::Passed => "Passed",
            EnrollmentStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One student in one course. Grades only accumulate.
#[derive(Debug, Clone)]
pub struct Enrollment {
    student: Rc<Student>,
    course: Rc<Course>,
    grades: Vec<f64>,
}

impl Enrollment {
    pub fn new(student: Rc<Student>, course: Rc<Course>) -> Self {
        Self {
            student,
            course,
            grades: Vec::new(),
        }
    }

    pub fn student(&self) -> &Rc<Student> {
        &self.student
    }

    pub fn course(&self) -> &Rc<Course> {
        &self.course
    }

    pub fn grades(&self) -> &[f64] {
        &self.grades
    }

    pub fn matches(&self, student_id: &str, course_code: &str) -> bool {
        self.student.identifier() == student_id && self.course.code == course_code
    }

    pub fn add_grade(&mut self, grade: f64) -> Result<()> {
        if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
            return Err(AcademicError::OutOfRange { value: grade });
        }
        self.grades.push(grade);
        Ok(())
    }

    pub fn average(&self) -> f64 {
        if self.grades.is_empty() {
            return 0.0;
        }
        self.grades.iter().sum::<f64>() / self.grades.len() as f64
    }

    pub fn has_passed(&self) -> bool {
        self.average() >= PASSING_GRADE
    }

    pub fn status(&self) -> EnrollmentStatus {
        if self.grades.is_empty() {
            EnrollmentStatus::InProgress
        } else if self.has_passed() {
            EnrollmentStatus::Passed
        } else {
            EnrollmentStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn born_years_ago(years: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(Local::now().year() - years, 6, 15).unwrap()
    }

    fn enrollment() -> Enrollment {
        let student =
            Student::new("E-1", "Ana", "Gomez", born_years_ago(20), "Law", "2024-0001").unwrap();
        let course = Course::new("LAW-101", "Roman Law", 3);
        Enrollment::new(Rc::new(student), Rc::new(course))
    }

    #[test]
    fn test_student_minimum_age() {
        assert!(Student::new("E-1", "Ana", "Gomez", born_years_ago(15), "Law", "2024-0001").is_ok());
        let err = Student::new("E-2", "Luis", "Rosario", born_years_ago(14), "Law", "2024-0002")
            .unwrap_err();
        assert!(matches!(err, AcademicError::ValidationError { .. }));
    }

    #[test]
    fn test_professor_minimum_age() {
        assert!(Professor::new("P-1", "Carlos", "Perez", born_years_ago(25), "Engineering").is_ok());
        let err = Professor::new("P-2", "Maria", "Lopez", born_years_ago(24), "Law").unwrap_err();
        assert!(matches!(err, AcademicError::ValidationError { .. }));
    }

    #[test]
    fn test_age_ignores_day_of_year() {
        let student = Student::new(
            "E-1",
            "Ana",
            "Gomez",
            NaiveDate::from_ymd_opt(2005, 12, 31).unwrap(),
            "Law",
            "2024-0001",
        )
        .unwrap();
        assert_eq!(student.person.age_in(2025), 20);
    }

    #[test]
    fn test_person_display_includes_role() {
        let professor =
            Professor::new("P-101", "Carlos", "Perez", born_years_ago(40), "Engineering").unwrap();
        assert_eq!(professor.to_string(), "[P-101] Carlos Perez (Role: Professor)");
        assert_eq!(professor.person.role(), Role::Professor);
    }

    #[test]
    fn test_role_follows_the_record_type() {
        let json = r#"{"id":"E-9","first_name":"Eva","last_name":"Rios",
            "birth_date":"2004-02-02","role":"Professor",
            "program":"Law","enrollment_number":"2024-0009"}"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.person.role(), Role::Student);
        assert!(student.to_string().ends_with("(Role: Student)"));

        let professor = Professor::new("P-1", "Carlos", "Perez", born_years_ago(40), "Law")
            .unwrap()
            .with_salary(50000.0);
        let value = serde_json::to_value(&professor).unwrap();
        assert!(value.get("role").is_none());
        let restored: Professor = serde_json::from_value(value).unwrap();
        assert_eq!(restored, professor);
    }

    #[test]
    fn test_passing_enrollment() {
        let mut enrollment = enrollment();
        for grade in [8.0, 9.0, 7.0] {
            enrollment.add_grade(grade).unwrap();
        }
        assert!((enrollment.average() - 8.0).abs() < 1e-9);
        assert_eq!(enrollment.status(), EnrollmentStatus::Passed);
    }

    #[test]
    fn test_failing_enrollment() {
        let mut enrollment = enrollment();
        enrollment.add_grade(5.0).unwrap();
        enrollment.add_grade(6.0).unwrap();
        assert!((enrollment.average() - 5.5).abs() < 1e-9);
        assert_eq!(enrollment.status(), EnrollmentStatus::Failed);
        assert_eq!(enrollment.status().label(), "Failed");
    }

    #[test]
    fn test_empty_enrollment_is_in_progress() {
        let enrollment = enrollment();
        assert_eq!(enrollment.average(), 0.0);
        assert_eq!(enrollment.status(), EnrollmentStatus::InProgress);
    }

    #[test]
    fn test_grade_bounds() {
        let mut enrollment = enrollment();
        assert!(enrollment.add_grade(0.0).is_ok());
        assert!(enrollment.add_grade(10.0).is_ok());
        assert!(matches!(
            enrollment.add_grade(10.5),
            Err(AcademicError::OutOfRange { .. })
        ));
        assert!(enrollment.add_grade(-0.1).is_err());
        assert!(enrollment.add_grade(f64::NAN).is_err());
        assert_eq!(enrollment.grades(), &[0.0, 10.0]);
    }

    #[test]
    fn test_exact_threshold_passes() {
        let mut enrollment = enrollment();
        enrollment.add_grade(7.0).unwrap();
        assert!(enrollment.has_passed());
    }
}
