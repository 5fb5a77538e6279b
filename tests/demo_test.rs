use academic_records::app::demo::run_demo;
use academic_records::{AppConfig, EnrollmentManager};

fn demo_output(manager: &mut EnrollmentManager, config: &AppConfig) -> String {
    let mut out = Vec::new();
    run_demo(manager, config, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_demo_walkthrough_sections() {
    let config = AppConfig::default();
    let mut manager = EnrollmentManager::default();
    let output = demo_output(&mut manager, &config);

    assert!(output.contains("Generating sample data..."));
    assert!(output.contains(" > 15 students added."));
    assert!(output.contains("DEMO 1: REPORTS"));
    assert!(output.contains("1.6. Flexible search (students in 'Law')"));
    assert!(output.contains("DEMO 2: RULE-BASED VALIDATION"));
    assert!(output.contains("The validator reported 2 error(s) (expected):"));
    assert!(output.contains("[Required] 'first_name' cannot be missing or empty."));
    assert!(output.contains("[Pattern] 'enrollment_number' ('MATRICULA-MALA')"));
    assert!(output.contains("Parsing '8.5': OK. Grade: 8.50"));
    assert!(output.contains("Parsing 'Passed': FAILED."));
    assert!(!manager.enrollments().is_empty());
}

#[test]
fn test_demo_reuses_loaded_data_and_same_seed_reproduces() {
    let config = AppConfig::default();

    let mut first = EnrollmentManager::default();
    let first_output = demo_output(&mut first, &config);
    let mut second = EnrollmentManager::default();
    let second_output = demo_output(&mut second, &config);
    assert_eq!(first_output, second_output);

    let rerun = demo_output(&mut first, &config);
    assert!(rerun.contains("Data already loaded. Skipping generation..."));
    assert_eq!(first.registry().students.len(), 15);
}
