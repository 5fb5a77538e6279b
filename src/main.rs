use academic_records::adapters::export::export_csv;
use academic_records::app::demo::{generate_sample_data, run_demo};
use academic_records::app::menu::Menu;
use academic_records::app::tables;
use academic_records::core::reports;
use academic_records::utils::error::ErrorSeverity;
use academic_records::utils::{logger, validation::Validate};
use academic_records::{
    AcademicError, AppConfig, CliConfig, Command, EnrollmentManager, LocalStorage, Registry,
    ReportKind, SnapshotStore, Validator,
};
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = AppConfig::from_optional_file(&cli.config)
        .with_context(|| format!("Failed to load config file '{}'", cli.config))?;

    if config.logging.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(
            cli.verbose,
            &config.logging.level,
            config.logging.file.as_deref().map(Path::new),
        );
    }

    tracing::info!("🚀 Starting academic-records");
    cli.apply_overrides(&mut config);
    if cli.verbose {
        tracing::debug!("Effective config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let store = SnapshotStore::with_files(LocalStorage::new(&config.data.dir), config.snapshot_files());
    let mut manager = EnrollmentManager::new(Registry::new());

    if let Err(e) = run(&cli, &config, &store, &mut manager) {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    tracing::info!("✅ academic-records finished");
    Ok(())
}

fn run(
    cli: &CliConfig,
    config: &AppConfig,
    store: &SnapshotStore<LocalStorage>,
    manager: &mut EnrollmentManager,
) -> Result<(), AcademicError> {
    // A broken snapshot does not stop the tool, but nothing is written back over it.
    let can_save = match store.load_into(manager.registry_mut()) {
        Ok(_) => true,
        Err(e) => {
            tracing::error!("Failed to load snapshot from {}: {}", config.data.dir, e);
            tracing::warn!("Saving is disabled for this session");
            false
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command() {
        Command::Demo => run_demo(manager, config, &mut out)?,
        Command::Menu => {
            if manager.registry().students.is_empty() {
                writeln!(out, "No data found. Generating sample data...")?;
                generate_sample_data(manager, &config.demo)?;
            }
            let stdin = std::io::stdin();
            let mut menu = Menu::new(manager, stdin.lock(), &mut out).with_top_n(config.reports.top_n);
            if can_save {
                menu = menu.with_snapshot(store);
            }
            menu.run()?;
            if can_save && config.data.save_on_exit {
                store.save(manager.registry())?;
            }
        }
        Command::Report { kind, student } => {
            // enrollments are never persisted; reports run over seeded sample enrollments
            if manager.enrollments().is_empty() {
                generate_sample_data(manager, &config.demo)?;
            }
            let registry = manager.registry();
            let text = match kind {
                ReportKind::Top => reports::render_top(&manager.top(config.reports.top_n)),
                ReportKind::AtRisk => reports::render_at_risk(&manager.at_risk()),
                ReportKind::Popular => reports::render_popular_courses(&manager.popular_courses()),
                ReportKind::Average => {
                    format!("   > Overall average: {:.2}\n", manager.institution_average())
                }
                ReportKind::Programs => reports::render_program_stats(&manager.stats_by_program()),
                ReportKind::Student => {
                    let id = student.ok_or_else(|| {
                        AcademicError::invalid_input("student", "", "--student is required")
                    })?;
                    manager.student_report(&id)?.to_string()
                }
                ReportKind::Students => tables::students_table(registry.students.all_values()),
                ReportKind::Professors => tables::professors_table(registry.professors.all_values()),
                ReportKind::Courses => tables::courses_table(registry, registry.courses.all_values()),
            };
            write!(out, "{}", text)?;
        }
        Command::Export { dir } => {
            for path in export_csv(manager.registry(), Path::new(&dir))? {
                writeln!(out, "📁 {}", path.display())?;
            }
        }
        Command::Validate => {
            let results = Validator::new().validate_registry(manager.registry());
            for record in &results {
                if record.errors.is_empty() {
                    continue;
                }
                writeln!(out, "[{}] {}", record.id, record.kind)?;
                for error in &record.errors {
                    writeln!(out, "   > {}", error)?;
                }
            }
            let invalid = results.iter().filter(|r| !r.errors.is_empty()).count();
            writeln!(out, "{} record(s) checked, {} with violations.", results.len(), invalid)?;
        }
    }

    Ok(())
}
