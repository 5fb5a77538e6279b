use crate::core::manager::Registry;
use crate::domain::model::{Course, Professor, Student};
use std::rc::Rc;

fn separator(widths: &[usize]) -> String {
    "-".repeat(widths.iter().sum::<usize>() + 3 * widths.len() + 1)
}

fn row(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str(&format!(" {:<width$} |", cell, width = *width));
    }
    line
}

fn table(headers: &[&str], widths: &[usize], rows: Vec<Vec<String>>) -> String {
    let sep = separator(widths);
    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(sep.clone());
    out.push(row(headers, widths));
    out.push(sep.clone());
    for r in &rows {
        let cells: Vec<&str> = r.iter().map(String::as_str).collect();
        out.push(row(&cells, widths));
    }
    out.push(sep);
    out.join("\n") + "\n"
}

/// Whole currency units with thousands separators, e.g. `$50,000`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

pub fn students_table<'a>(students: impl Iterator<Item = &'a Rc<Student>>) -> String {
    let rows: Vec<Vec<String>> = students
        .map(|s| {
            vec![
                s.person.id().to_string(),
                s.person.full_name(),
                s.program.clone(),
                s.enrollment_number.clone(),
            ]
        })
        .collect();
    if rows.is_empty() {
        return "No students to show.\n".to_string();
    }
    table(&["ID", "Full name", "Program", "Enrollment no."], &[12, 25, 20, 15], rows)
}

pub fn professors_table<'a>(professors: impl Iterator<Item = &'a Rc<Professor>>) -> String {
    let rows: Vec<Vec<String>> = professors
        .map(|p| {
            vec![
                p.person.id().to_string(),
                p.person.full_name(),
                p.department.clone(),
                format_currency(p.salary),
            ]
        })
        .collect();
    if rows.is_empty() {
        return "No professors to show.\n".to_string();
    }
    table(&["ID", "Full name", "Department", "Salary"], &[12, 25, 20, 15], rows)
}

pub fn courses_table<'a>(registry: &Registry, courses: impl Iterator<Item = &'a Rc<Course>>) -> String {
    let rows: Vec<Vec<String>> = courses
        .map(|c| {
            vec![
                c.code.clone(),
                c.name.clone(),
                c.credits.to_string(),
                registry.professor_name(c).unwrap_or_else(|| "N/A".to_string()),
            ]
        })
        .collect();
    if rows.is_empty() {
        return "No courses to show.\n".to_string();
    }
    table(&["Code", "Name", "Credits", "Professor"], &[10, 25, 10, 20], rows)
}
