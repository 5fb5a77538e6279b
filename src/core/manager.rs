use crate::core::reports::{
    CourseEnrollmentCount, ProgramStats, ReportLine, StudentAverage, StudentReport,
};
use crate::core::repository::Repository;
use crate::domain::model::{Course, Enrollment, Professor, Student, PASSING_GRADE};
use crate::domain::ports::Identifiable;
use crate::utils::error::{AcademicError, Result};
use std::collections::HashMap;
use std::rc::Rc;

pub const DEFAULT_TOP_N: usize = 10;

/// The three master-data repositories.
#[derive(Debug, Default)]
pub struct Registry {
    pub students: Repository<Student>,
    pub professors: Repository<Professor>,
    pub courses: Repository<Course>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn professor_name(&self, course: &Course) -> Option<String> {
        let id = course.professor_id.as_deref()?;
        self.professors
            .find_by_id(id)
            .map(|p| p.person.first_name.clone())
    }
}

/// Aggregate root for enrollments and grades, and the source of every report.
#[derive(Debug, Default)]
pub struct EnrollmentManager {
    registry: Registry,
    enrollments: Vec<Enrollment>,
}

impl EnrollmentManager {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            enrollments: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Master-data CRUD. Enrollments are untouched by anything done here.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    pub fn enroll(&mut self, student: Rc<Student>, course: Rc<Course>) -> Result<()> {
        let student_id = student.identifier();
        if self
            .enrollments
            .iter()
            .any(|e| e.matches(student_id, &course.code))
        {
            return Err(AcademicError::AlreadyEnrolled {
                student_id: student_id.to_string(),
                course_code: course.code.clone(),
            });
        }

        tracing::info!("Student {} enrolled in {}", student_id, course.code);
        self.enrollments.push(Enrollment::new(student, course));
        Ok(())
    }

    pub fn enroll_by_id(&mut self, student_id: &str, course_code: &str) -> Result<()> {
        let student = self
            .registry
            .students
            .find_by_id(student_id)
            .ok_or_else(|| AcademicError::not_found(Student::KIND, student_id))?;
        let course = self
            .registry
            .courses
            .find_by_id(course_code)
            .ok_or_else(|| AcademicError::not_found(Course::KIND, course_code))?;
        self.enroll(student, course)
    }

    pub fn record_grade(&mut self, student_id: &str, course_code: &str, grade: f64) -> Result<()> {
        let enrollment = self
            .enrollments
            .iter_mut()
            .find(|e| e.matches(student_id, course_code))
            .ok_or_else(|| {
                AcademicError::not_found("Enrollment", &format!("{}/{}", student_id, course_code))
            })?;

        enrollment.add_grade(grade)?;
        tracing::info!("Grade {} recorded for {} in {}", grade, student_id, course_code);
        Ok(())
    }

    pub fn student_report(&self, student_id: &str) -> Result<StudentReport> {
        let mut matching = self
            .enrollments
            .iter()
            .filter(|e| e.student().identifier() == student_id)
            .peekable();

        let student = matching
            .peek()
            .map(|e| Rc::clone(e.student()))
            .ok_or_else(|| AcademicError::not_found(Student::KIND, student_id))?;

        let lines = matching
            .map(|e| ReportLine {
                course_name: e.course().name.clone(),
                average: e.average(),
                status: e.status(),
            })
            .collect();

        Ok(StudentReport { student, lines })
    }

    /// Highest overall averages first. Ties keep first-enrollment order.
    pub fn top(&self, n: usize) -> Vec<StudentAverage> {
        let mut ranked = overall_averages(self.enrollments.iter());
        ranked.sort_by(|a, b| b.average.total_cmp(&a.average));
        ranked.truncate(n);
        tracing::debug!("Top {} query returned {} student(s)", n, ranked.len());
        ranked
    }

    pub fn at_risk(&self) -> Vec<Rc<Student>> {
        overall_averages(self.enrollments.iter())
            .into_iter()
            .filter(|s| s.average < PASSING_GRADE)
            .map(|s| s.student)
            .collect()
    }

    pub fn popular_courses(&self) -> Vec<CourseEnrollmentCount> {
        let mut counts: Vec<CourseEnrollmentCount> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for enrollment in &self.enrollments {
            let name = enrollment.course().name.as_str();
            match index.get(name) {
                Some(&i) => counts[i].enrollment_count += 1,
                None => {
                    index.insert(name, counts.len());
                    counts.push(CourseEnrollmentCount {
                        course_name: name.to_string(),
                        enrollment_count: 1,
                    });
                }
            }
        }

        counts.sort_by(|a, b| b.enrollment_count.cmp(&a.enrollment_count));
        counts
    }

    pub fn institution_average(&self) -> f64 {
        let averages = overall_averages(self.enrollments.iter());
        mean(averages.iter().map(|s| s.average))
    }

    pub fn stats_by_program(&self) -> Vec<ProgramStats> {
        let mut groups: Vec<(&str, Vec<&Enrollment>)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for enrollment in &self.enrollments {
            let program = enrollment.student().program.as_str();
            let i = *index.entry(program).or_insert_with(|| {
                groups.push((program, Vec::new()));
                groups.len() - 1
            });
            groups[i].1.push(enrollment);
        }

        groups
            .into_iter()
            .map(|(program, members)| {
                let averages = overall_averages(members.into_iter());
                ProgramStats {
                    program: program.to_string(),
                    student_count: averages.len(),
                    average_score: mean(averages.iter().map(|s| s.average)),
                }
            })
            .collect()
    }

    pub fn search_students<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Rc<Student>> + 'a
    where
        P: Fn(&Student) -> bool + 'a,
    {
        self.registry.students.find_where(predicate)
    }
}

/// Groups by student id in first-appearance order. Every course weighs the same
/// regardless of how many grades it holds.
fn overall_averages<'a>(enrollments: impl Iterator<Item = &'a Enrollment>) -> Vec<StudentAverage> {
    let mut groups: Vec<(Rc<Student>, Vec<f64>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for enrollment in enrollments {
        let id = enrollment.student().identifier();
        match index.get(id) {
            Some(&i) => groups[i].1.push(enrollment.average()),
            None => {
                index.insert(id, groups.len());
                groups.push((Rc::clone(enrollment.student()), vec![enrollment.average()]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(student, course_averages)| StudentAverage {
            student,
            average: mean(course_averages.into_iter()),
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn student(id: &str, name: &str, program: &str) -> Student {
        Student::new(
            id,
            name,
            "Test",
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            program,
            "2024-0001",
        )
        .unwrap()
    }

    fn manager() -> EnrollmentManager {
        let mut registry = Registry::new();
        registry.students.add(student("A", "Alice", "Software")).unwrap();
        registry.students.add(student("B", "Bruno", "Law")).unwrap();
        registry.courses.add(Course::new("CS-101", "Programming I", 4)).unwrap();
        registry.courses.add(Course::new("MAT-101", "Calculus I", 5)).unwrap();
        EnrollmentManager::new(registry)
    }

    fn grade_all(manager: &mut EnrollmentManager, student: &str, course: &str, grades: &[f64]) {
        manager.enroll_by_id(student, course).unwrap();
        for &g in grades {
            manager.record_grade(student, course, g).unwrap();
        }
    }

    #[test]
    fn test_enroll_twice_fails() {
        let mut manager = manager();
        manager.enroll_by_id("A", "CS-101").unwrap();
        let err = manager.enroll_by_id("A", "CS-101").unwrap_err();
        assert!(matches!(err, AcademicError::AlreadyEnrolled { .. }));
        manager.enroll_by_id("A", "MAT-101").unwrap();
        assert_eq!(manager.enrollments().len(), 2);
    }

    #[test]
    fn test_enroll_unknown_ids() {
        let mut manager = manager();
        assert!(matches!(
            manager.enroll_by_id("Z", "CS-101"),
            Err(AcademicError::NotFound { .. })
        ));
        assert!(matches!(
            manager.enroll_by_id("A", "BIO-999"),
            Err(AcademicError::NotFound { .. })
        ));
        assert!(manager.enrollments().is_empty());
    }

    #[test]
    fn test_record_grade_requires_enrollment() {
        let mut manager = manager();
        assert!(matches!(
            manager.record_grade("A", "CS-101", 8.0),
            Err(AcademicError::NotFound { .. })
        ));
        manager.enroll_by_id("A", "CS-101").unwrap();
        assert!(matches!(
            manager.record_grade("A", "CS-101", 11.0),
            Err(AcademicError::OutOfRange { .. })
        ));
        assert!(manager.enrollments()[0].grades().is_empty());
    }

    #[test]
    fn test_overall_average_is_unweighted() {
        let mut manager = manager();
        grade_all(&mut manager, "A", "CS-101", &[10.0, 10.0, 10.0, 10.0]);
        grade_all(&mut manager, "A", "MAT-101", &[6.0]);

        let top = manager.top(DEFAULT_TOP_N);
        assert_eq!(top.len(), 1);
        assert!((top[0].average - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_ungraded_enrollment_counts_as_zero() {
        let mut manager = manager();
        grade_all(&mut manager, "A", "CS-101", &[9.0]);
        manager.enroll_by_id("A", "MAT-101").unwrap();

        assert!((manager.institution_average() - 4.5).abs() < 1e-9);
        assert_eq!(manager.at_risk().len(), 1);
    }

    #[test]
    fn test_top_ties_keep_first_appearance() {
        let mut manager = manager();
        grade_all(&mut manager, "B", "CS-101", &[8.0]);
        grade_all(&mut manager, "A", "CS-101", &[8.0]);

        let ids: Vec<String> = manager
            .top(10)
            .iter()
            .map(|s| s.student.identifier().to_string())
            .collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(manager.top(1).len(), 1);
        assert!(manager.top(0).is_empty());
    }

    #[test]
    fn test_popular_courses_orders_by_count() {
        let mut manager = manager();
        manager.enroll_by_id("A", "CS-101").unwrap();
        manager.enroll_by_id("A", "MAT-101").unwrap();
        manager.enroll_by_id("B", "MAT-101").unwrap();

        let popular = manager.popular_courses();
        assert_eq!(popular[0].course_name, "Calculus I");
        assert_eq!(popular[0].enrollment_count, 2);
        assert_eq!(popular[1].course_name, "Programming I");
        assert_eq!(popular[1].enrollment_count, 1);
    }

    #[test]
    fn test_empty_manager_reports() {
        let manager = manager();
        assert_eq!(manager.institution_average(), 0.0);
        assert!(manager.top(10).is_empty());
        assert!(manager.at_risk().is_empty());
        assert!(manager.popular_courses().is_empty());
        assert!(manager.stats_by_program().is_empty());
        assert!(matches!(
            manager.student_report("A"),
            Err(AcademicError::NotFound { .. })
        ));
    }

    #[test]
    fn test_student_report_lines() {
        let mut manager = manager();
        grade_all(&mut manager, "A", "CS-101", &[8.0, 9.0, 7.0]);
        manager.enroll_by_id("A", "MAT-101").unwrap();

        let report = manager.student_report("A").unwrap();
        assert_eq!(report.lines.len(), 2);
        let text = report.to_string();
        assert!(text.starts_with("--- ACADEMIC REPORT: Alice Test ---"));
        assert!(text.contains("Course: Programming I | Average: 8.00 | Status: Passed"));
        assert!(text.contains("Course: Calculus I | Average: 0.00 | Status: In progress"));
    }

    #[test]
    fn test_search_students_bypasses_enrollments() {
        let manager = manager();
        let law: Vec<&str> = manager
            .search_students(|s| s.program == "Law")
            .map(|s| s.identifier())
            .collect();
        assert_eq!(law, vec!["B"]);
    }

    #[test]
    fn test_enrollment_survives_student_removal() {
        let mut manager = manager();
        grade_all(&mut manager, "A", "CS-101", &[9.0]);
        assert!(manager.registry_mut().students.remove("A"));

        let report = manager.student_report("A").unwrap();
        assert_eq!(report.lines.len(), 1);
        assert!(matches!(
            manager.enroll_by_id("A", "MAT-101"),
            Err(AcademicError::NotFound { .. })
        ));
    }
}
