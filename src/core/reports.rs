use crate::domain::model::{EnrollmentStatus, Student};
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// A student with the unweighted mean of their per-course averages.
#[derive(Debug, Clone)]
pub struct StudentAverage {
    pub student: Rc<Student>,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseEnrollmentCount {
    pub course_name: String,
    pub enrollment_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramStats {
    pub program: String,
    pub student_count: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub course_name: String,
    pub average: f64,
    pub status: EnrollmentStatus,
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  > Course: {} | Average: {:.2} | Status: {}",
            self.course_name, self.average, self.status
        )
    }
}

#[derive(Debug, Clone)]
pub struct StudentReport {
    pub student: Rc<Student>,
    pub lines: Vec<ReportLine>,
}

impl fmt::Display for StudentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- ACADEMIC REPORT: {} ---", self.student.person.full_name())?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

pub fn render_top(entries: &[StudentAverage]) -> String {
    if entries.is_empty() {
        return "   > No graded students yet.\n".to_string();
    }
    entries
        .iter()
        .map(|e| format!("   > {} - Avg: {:.2}\n", e.student.person.full_name(), e.average))
        .collect()
}

pub fn render_at_risk(students: &[Rc<Student>]) -> String {
    if students.is_empty() {
        return "   > No students at risk!\n".to_string();
    }
    students
        .iter()
        .map(|s| format!("   > {}\n", s.person.full_name()))
        .collect()
}

pub fn render_popular_courses(courses: &[CourseEnrollmentCount]) -> String {
    courses
        .iter()
        .map(|c| format!("   > {}: {} student(s)\n", c.course_name, c.enrollment_count))
        .collect()
}

pub fn render_program_stats(stats: &[ProgramStats]) -> String {
    let mut out = String::from("--- Statistics by Program ---\n");
    for s in stats {
        out.push_str(&format!(
            "   > {}: {} students | Overall average: {:.2}\n",
            s.program, s.student_count, s.average_score
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_line_uses_two_decimals() {
        let line = ReportLine {
            course_name: "Roman Law".to_string(),
            average: 8.0,
            status: EnrollmentStatus::Passed,
        };
        assert_eq!(
            line.to_string(),
            "  > Course: Roman Law | Average: 8.00 | Status: Passed"
        );
    }

    #[test]
    fn test_empty_renderings() {
        assert_eq!(render_at_risk(&[]), "   > No students at risk!\n");
        assert_eq!(render_popular_courses(&[]), "");
        assert_eq!(render_program_stats(&[]), "--- Statistics by Program ---\n");
    }
}
