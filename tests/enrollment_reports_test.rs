use academic_records::core::Identifiable;
use academic_records::{AcademicError, Course, EnrollmentManager, EnrollmentStatus, Registry, Student};
use chrono::NaiveDate;

fn student(id: &str, name: &str, program: &str) -> Student {
    Student::new(
        id,
        name,
        "Doe",
        NaiveDate::from_ymd_opt(2001, 5, 20).unwrap(),
        program,
        "2023-0042",
    )
    .unwrap()
}

fn enroll_with_grades(manager: &mut EnrollmentManager, sid: &str, code: &str, grades: &[f64]) {
    manager.enroll_by_id(sid, code).unwrap();
    for &grade in grades {
        manager.record_grade(sid, code, grade).unwrap();
    }
}

fn ids(students: impl Iterator<Item = String>) -> Vec<String> {
    students.collect()
}

#[test]
fn test_two_student_ranking_scenario() {
    let mut registry = Registry::new();
    registry.students.add(student("A", "Ana", "Law")).unwrap();
    registry.students.add(student("B", "Ben", "Law")).unwrap();
    registry.courses.add(Course::new("LAW-101", "Civil Law", 4)).unwrap();
    registry.courses.add(Course::new("LAW-102", "Criminal Law", 4)).unwrap();
    let mut manager = EnrollmentManager::new(registry);

    enroll_with_grades(&mut manager, "A", "LAW-101", &[9.0]);
    enroll_with_grades(&mut manager, "A", "LAW-102", &[8.0]);
    enroll_with_grades(&mut manager, "B", "LAW-101", &[5.0]);

    let top = manager.top(10);
    assert_eq!(
        ids(top.iter().map(|s| s.student.identifier().to_string())),
        vec!["A", "B"]
    );
    assert!((top[0].average - 8.5).abs() < 1e-9);
    assert!((top[1].average - 5.0).abs() < 1e-9);

    assert_eq!(
        ids(manager.at_risk().iter().map(|s| s.identifier().to_string())),
        vec!["B"]
    );
    assert!((manager.institution_average() - 6.75).abs() < 1e-9);
}

#[test]
fn test_program_statistics() {
    let mut registry = Registry::new();
    registry.students.add(student("L1", "Lia", "Law")).unwrap();
    registry.students.add(student("L2", "Leo", "Law")).unwrap();
    registry.students.add(student("M1", "Mia", "Medicine")).unwrap();
    registry.courses.add(Course::new("LAW-101", "Civil Law", 4)).unwrap();
    registry.courses.add(Course::new("MED-101", "Anatomy", 6)).unwrap();
    let mut manager = EnrollmentManager::new(registry);

    enroll_with_grades(&mut manager, "L1", "LAW-101", &[7.0]);
    enroll_with_grades(&mut manager, "M1", "MED-101", &[6.0, 8.0]);
    enroll_with_grades(&mut manager, "L2", "LAW-101", &[9.0]);

    let stats = manager.stats_by_program();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].program, "Law");
    assert_eq!(stats[0].student_count, 2);
    assert!((stats[0].average_score - 8.0).abs() < 1e-9);
    assert_eq!(stats[1].program, "Medicine");
    assert_eq!(stats[1].student_count, 1);
    assert!((stats[1].average_score - 7.0).abs() < 1e-9);
}

#[test]
fn test_enrollment_status_lifecycle() {
    let mut registry = Registry::new();
    registry.students.add(student("S", "Sam", "Humanities")).unwrap();
    registry.courses.add(Course::new("HUM-101", "Philosophy", 3)).unwrap();
    registry.courses.add(Course::new("HUM-102", "History", 3)).unwrap();
    let mut manager = EnrollmentManager::new(registry);

    manager.enroll_by_id("S", "HUM-101").unwrap();
    assert_eq!(manager.enrollments()[0].status(), EnrollmentStatus::InProgress);

    for grade in [8.0, 9.0, 7.0] {
        manager.record_grade("S", "HUM-101", grade).unwrap();
    }
    enroll_with_grades(&mut manager, "S", "HUM-102", &[5.0, 6.0]);

    let passed = &manager.enrollments()[0];
    assert!((passed.average() - 8.0).abs() < 1e-9);
    assert_eq!(passed.status(), EnrollmentStatus::Passed);

    let failed = &manager.enrollments()[1];
    assert!((failed.average() - 5.5).abs() < 1e-9);
    assert_eq!(failed.status(), EnrollmentStatus::Failed);

    // boundaries are inclusive
    assert!(manager.record_grade("S", "HUM-102", 0.0).is_ok());
    assert!(manager.record_grade("S", "HUM-102", 10.0).is_ok());
    assert!(matches!(
        manager.record_grade("S", "HUM-102", -0.1),
        Err(AcademicError::OutOfRange { .. })
    ));
    assert_eq!(manager.enrollments()[1].grades().len(), 4);
}

#[test]
fn test_enrollments_survive_master_data_removal() {
    let mut registry = Registry::new();
    registry.students.add(student("R", "Rui", "Architecture")).unwrap();
    registry.courses.add(Course::new("ARQ-101", "Drawing", 4)).unwrap();
    let mut manager = EnrollmentManager::new(registry);
    enroll_with_grades(&mut manager, "R", "ARQ-101", &[9.5]);

    assert!(manager.registry_mut().students.remove("R"));
    assert!(!manager.registry_mut().students.remove("R"));

    let report = manager.student_report("R").unwrap();
    assert_eq!(report.student.person.full_name(), "Rui Doe");
    assert_eq!(report.lines.len(), 1);
    assert!(matches!(
        manager.enroll_by_id("R", "ARQ-101"),
        Err(AcademicError::NotFound { .. })
    ));
}

#[test]
fn test_duplicate_keys_are_rejected() {
    let mut registry = Registry::new();
    registry.courses.add(Course::new("CS-101", "Programming I", 4)).unwrap();
    let err = registry
        .courses
        .add(Course::new("CS-101", "Another name", 2))
        .unwrap_err();

    assert!(matches!(err, AcademicError::DuplicateKey { .. }));
    assert_eq!(registry.courses.len(), 1);
    assert_eq!(registry.courses.find_by_id("CS-101").unwrap().name, "Programming I");
}
