use crate::adapters::storage::LocalStorage;
use crate::app::{demo::parse_grade, tables};
use crate::core::manager::EnrollmentManager;
use crate::core::reports;
use crate::core::snapshot::SnapshotStore;
use crate::core::validator::Validator;
use crate::domain::model::{Course, Professor, Student};
use crate::domain::ports::{Identifiable, Storage};
use crate::utils::error::{AcademicError, Result};
use chrono::NaiveDate;
use std::io::{BufRead, ErrorKind, Write};

const MAIN_MENU: &str = "
=============================================
      ACADEMIC RECORDS - MAIN MENU
=============================================
 1. Students
 2. Professors
 3. Courses
 4. Enroll a student in a course
 5. Record a grade
 6. Reports
 7. Validate all records
 8. Save data
 0. Exit";

const REPORTS_MENU: &str = "
--- Reports ---
 1. Top students
 2. Students at risk
 3. Most popular courses
 4. Institution average
 5. Statistics by program
 6. Individual student report
 0. Back";

enum Flow {
    Continue,
    Exit,
}

/// Console menu over any line-based input. Errors are shown and the menu comes back;
/// end of input exits.
pub struct Menu<'a, R, W, S: Storage = LocalStorage> {
    manager: &'a mut EnrollmentManager,
    snapshot: Option<&'a SnapshotStore<S>>,
    top_n: usize,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write, S: Storage> Menu<'a, R, W, S> {
    pub fn new(manager: &'a mut EnrollmentManager, input: R, out: W) -> Self {
        Self {
            manager,
            snapshot: None,
            top_n: crate::core::manager::DEFAULT_TOP_N,
            input,
            out,
        }
    }

    pub fn with_snapshot(mut self, snapshot: &'a SnapshotStore<S>) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn run(&mut self) -> Result<()> {
        tracing::info!("Interactive menu started");
        loop {
            writeln!(self.out, "{}", MAIN_MENU)?;
            let flow = match self.prompt("Select an option") {
                Ok(option) => self.dispatch(option.as_str()),
                Err(e) => Err(e),
            };

            match flow {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(AcademicError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => {
                    tracing::warn!("Menu action failed: {}", e);
                    writeln!(self.out, "❌ {}", e.user_friendly_message())?;
                    writeln!(self.out, "💡 {}", e.recovery_suggestion())?;
                }
            }
        }
        tracing::info!("Interactive menu finished");
        Ok(())
    }

    fn dispatch(&mut self, option: &str) -> Result<Flow> {
        match option {
            "1" => self.students_menu()?,
            "2" => self.professors_menu()?,
            "3" => self.courses_menu()?,
            "4" => self.enroll()?,
            "5" => self.record_grade()?,
            "6" => self.reports_menu()?,
            "7" => self.validate_all()?,
            "8" => self.save()?,
            "0" => return Ok(Flow::Exit),
            other => writeln!(self.out, "Invalid option '{}'.", other)?,
        }
        Ok(Flow::Continue)
    }

    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.out, "{}: ", label)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(std::io::Error::new(ErrorKind::UnexpectedEof, "end of input").into());
        }
        Ok(line.trim().to_string())
    }

    fn prompt_required(&mut self, label: &str) -> Result<String> {
        let value = self.prompt(label)?;
        if value.is_empty() {
            return Err(AcademicError::invalid_input(label, &value, "a value is required"));
        }
        Ok(value)
    }

    fn prompt_date(&mut self, label: &str) -> Result<NaiveDate> {
        let value = self.prompt(&format!("{} (YYYY-MM-DD)", label))?;
        NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map_err(|e| AcademicError::invalid_input(label, &value, e.to_string()))
    }

    fn prompt_number<T: std::str::FromStr>(&mut self, label: &str) -> Result<T> {
        let value = self.prompt(label)?;
        value
            .parse::<T>()
            .map_err(|_| AcademicError::invalid_input(label, &value, "not a valid number"))
    }

    fn ok(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "✅ {}", message)?;
        Ok(())
    }

    fn submenu(&mut self, title: &str, entries: &[&str]) -> Result<String> {
        writeln!(self.out, "\n--- {} ---", title)?;
        for (i, entry) in entries.iter().enumerate() {
            writeln!(self.out, " {}. {}", i + 1, entry)?;
        }
        writeln!(self.out, " 0. Back")?;
        self.prompt("Select an option")
    }

    fn students_menu(&mut self) -> Result<()> {
        match self.submenu("Students", &["Add", "List", "Find", "Remove"])?.as_str() {
            "1" => {
                let id = self.prompt_required("ID")?;
                let first = self.prompt_required("First name")?;
                let last = self.prompt_required("Last name")?;
                let born = self.prompt_date("Birth date")?;
                let program = self.prompt_required("Program")?;
                let number = self.prompt_required("Enrollment number")?;
                let student = Student::new(&id, &first, &last, born, &program, &number)?;
                self.manager.registry_mut().students.add(student)?;
                self.ok(&format!("Student {} added.", id))
            }
            "2" => {
                let table = tables::students_table(self.manager.registry().students.all_values());
                write!(self.out, "{}", table)?;
                Ok(())
            }
            "3" => {
                let id = self.prompt_required("ID")?;
                let student = self
                    .manager
                    .registry()
                    .students
                    .find_by_id(&id)
                    .ok_or_else(|| AcademicError::not_found(Student::KIND, &id))?;
                writeln!(self.out, "{} | {} | {}", student, student.program, student.enrollment_number)?;
                Ok(())
            }
            "4" => {
                let id = self.prompt_required("ID")?;
                if !self.manager.registry_mut().students.remove(&id) {
                    return Err(AcademicError::not_found(Student::KIND, &id));
                }
                self.ok(&format!("Student {} removed.", id))
            }
            _ => Ok(()),
        }
    }

    fn professors_menu(&mut self) -> Result<()> {
        match self.submenu("Professors", &["Add", "List", "Find", "Remove"])?.as_str() {
            "1" => {
                let id = self.prompt_required("ID")?;
                let first = self.prompt_required("First name")?;
                let last = self.prompt_required("Last name")?;
                let born = self.prompt_date("Birth date")?;
                let department = self.prompt_required("Department")?;
                let salary: f64 = self.prompt_number("Salary")?;
                let professor =
                    Professor::new(&id, &first, &last, born, &department)?.with_salary(salary);
                self.manager.registry_mut().professors.add(professor)?;
                self.ok(&format!("Professor {} added.", id))
            }
            "2" => {
                let table = tables::professors_table(self.manager.registry().professors.all_values());
                write!(self.out, "{}", table)?;
                Ok(())
            }
            "3" => {
                let id = self.prompt_required("ID")?;
                let professor = self
                    .manager
                    .registry()
                    .professors
                    .find_by_id(&id)
                    .ok_or_else(|| AcademicError::not_found(Professor::KIND, &id))?;
                writeln!(self.out, "{} | {}", professor, professor.department)?;
                Ok(())
            }
            "4" => {
                let id = self.prompt_required("ID")?;
                if !self.manager.registry_mut().professors.remove(&id) {
                    return Err(AcademicError::not_found(Professor::KIND, &id));
                }
                self.ok(&format!("Professor {} removed.", id))
            }
            _ => Ok(()),
        }
    }

    fn courses_menu(&mut self) -> Result<()> {
        let choice = self.submenu("Courses", &["Add", "List", "Find", "Assign professor", "Remove"])?;
        match choice.as_str() {
            "1" => {
                let code = self.prompt_required("Code")?;
                let name = self.prompt_required("Name")?;
                let credits: u32 = self.prompt_number("Credits")?;
                self.manager
                    .registry_mut()
                    .courses
                    .add(Course::new(&code, &name, credits))?;
                self.ok(&format!("Course {} added.", code))
            }
            "2" => {
                let registry = self.manager.registry();
                let table = tables::courses_table(registry, registry.courses.all_values());
                write!(self.out, "{}", table)?;
                Ok(())
            }
            "3" => {
                let code = self.prompt_required("Code")?;
                let registry = self.manager.registry();
                let course = registry
                    .courses
                    .find_by_id(&code)
                    .ok_or_else(|| AcademicError::not_found(Course::KIND, &code))?;
                let professor = registry
                    .professor_name(&course)
                    .unwrap_or_else(|| "N/A".to_string());
                writeln!(
                    self.out,
                    "[{}] {} | {} credits | Professor: {}",
                    course.code, course.name, course.credits, professor
                )?;
                Ok(())
            }
            "4" => {
                let code = self.prompt_required("Course code")?;
                let professor_id = self.prompt_required("Professor ID")?;
                let registry = self.manager.registry_mut();
                if !registry.professors.contains(&professor_id) {
                    return Err(AcademicError::not_found(Professor::KIND, &professor_id));
                }
                registry
                    .courses
                    .modify(&code, |c| c.professor_id = Some(professor_id.clone()))?;
                self.ok(&format!("Professor {} assigned to {}.", professor_id, code))
            }
            "5" => {
                let code = self.prompt_required("Code")?;
                if !self.manager.registry_mut().courses.remove(&code) {
                    return Err(AcademicError::not_found(Course::KIND, &code));
                }
                self.ok(&format!("Course {} removed.", code))
            }
            _ => Ok(()),
        }
    }

    fn enroll(&mut self) -> Result<()> {
        let student_id = self.prompt_required("Student ID")?;
        let course_code = self.prompt_required("Course code")?;
        self.manager.enroll_by_id(&student_id, &course_code)?;
        self.ok(&format!("{} enrolled in {}.", student_id, course_code))
    }

    fn record_grade(&mut self) -> Result<()> {
        let student_id = self.prompt_required("Student ID")?;
        let course_code = self.prompt_required("Course code")?;
        let text = self.prompt("Grade (0-10)")?;
        let grade = parse_grade(&text)?;
        self.manager.record_grade(&student_id, &course_code, grade)?;
        self.ok(&format!("Grade {} recorded.", grade))
    }

    fn reports_menu(&mut self) -> Result<()> {
        writeln!(self.out, "{}", REPORTS_MENU)?;
        let text = match self.prompt("Select an option")?.as_str() {
            "1" => reports::render_top(&self.manager.top(self.top_n)),
            "2" => reports::render_at_risk(&self.manager.at_risk()),
            "3" => reports::render_popular_courses(&self.manager.popular_courses()),
            "4" => format!("   > Overall average: {:.2}\n", self.manager.institution_average()),
            "5" => reports::render_program_stats(&self.manager.stats_by_program()),
            "6" => {
                let id = self.prompt_required("Student ID")?;
                self.manager.student_report(&id)?.to_string()
            }
            _ => return Ok(()),
        };
        write!(self.out, "{}", text)?;
        Ok(())
    }

    fn validate_all(&mut self) -> Result<()> {
        let results = Validator::new().validate_registry(self.manager.registry());
        let mut invalid = 0;
        for record in results.iter().filter(|r| !r.errors.is_empty()) {
            invalid += 1;
            writeln!(self.out, "[{}] {}", record.id, record.kind)?;
            for error in &record.errors {
                writeln!(self.out, "   > {}", error)?;
            }
        }
        writeln!(
            self.out,
            "{} record(s) checked, {} with violations.",
            results.len(),
            invalid
        )?;
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        match self.snapshot {
            Some(store) => {
                store.save(self.manager.registry())?;
                self.ok("Data saved.")
            }
            None => {
                writeln!(self.out, "Saving is not configured.")?;
                Ok(())
            }
        }
    }
}
