use crate::config::toml_config::AppConfig;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "academic-records")]
#[command(about = "Academic records: students, professors, courses, enrollments and grades")]
pub struct CliConfig {
    /// Path to TOML configuration file (optional)
    #[arg(short, long, default_value = "academic-records.toml")]
    pub config: String,

    /// Override the data directory holding the JSON snapshot
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Override the seed used to generate sample data
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the automated demonstration script
    Demo,
    /// Start the interactive console menu (default)
    Menu,
    /// Print one report over the loaded data
    Report {
        #[arg(value_enum)]
        kind: ReportKind,
        /// Student identifier, for the `student` report
        #[arg(long)]
        student: Option<String>,
    },
    /// Export students, professors and courses as CSV files
    Export {
        #[arg(default_value = "./export")]
        dir: String,
    },
    /// Check every stored record against its validation rules
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Top,
    AtRisk,
    Popular,
    Average,
    Programs,
    Student,
    Students,
    Professors,
    Courses,
}

impl CliConfig {
    /// Command-line values win over the configuration file.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.data.dir = dir.clone();
            tracing::info!("🔧 Data directory overridden to: {}", dir);
        }
        if let Some(seed) = self.seed {
            config.demo.seed = seed;
            tracing::info!("🔧 Demo seed overridden to: {}", seed);
        }
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Menu)
    }
}
