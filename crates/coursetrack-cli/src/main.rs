//! coursetrack CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod hook;

#[derive(Parser)]
#[command(
    name = "coursetrack",
    version,
    about = "Linear course tracker with quizzes and completion certificates"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show overall progress and per-module status
    Status {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List lessons and whether they are done
    Lessons {
        /// Only list lessons of this module
        #[arg(long)]
        module: Option<String>,
    },

    /// Print a lesson's content
    ShowLesson {
        /// Lesson ID
        lesson_id: String,
    },

    /// Mark a lesson as done
    Complete {
        /// Lesson ID
        lesson_id: String,
    },

    /// Show a module quiz, or submit answers to it
    Quiz {
        /// Module ID
        module_id: String,

        /// Option numbers (1-based), comma-separated; "-" leaves a question unanswered
        #[arg(long)]
        answers: Option<String>,
    },

    /// Save the name and company printed on the certificate
    Details {
        /// Full name of the certificate holder
        #[arg(long)]
        name: String,

        /// Company (optional)
        #[arg(long)]
        company: Option<String>,
    },

    /// Issue the completion certificate
    Certificate {
        /// Holder name (defaults to the saved details)
        #[arg(long)]
        name: Option<String>,

        /// Company (defaults to the saved details)
        #[arg(long)]
        company: Option<String>,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Clear all course progress
    Reset {
        /// Confirm the reset; progress cannot be recovered
        #[arg(long)]
        yes: bool,
    },

    /// Validate course catalog TOML files
    Validate {
        /// Path to catalog file or directory (defaults to the configured catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Create starter config and sample course
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coursetrack=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Status { json } => commands::status::execute(config, json),
        Commands::Lessons { module } => commands::lessons::list(config, module),
        Commands::ShowLesson { lesson_id } => commands::lessons::show(config, lesson_id),
        Commands::Complete { lesson_id } => commands::lessons::complete(config, lesson_id),
        Commands::Quiz { module_id, answers } => commands::quiz::execute(config, module_id, answers),
        Commands::Details { name, company } => {
            commands::certificate::save_details(config, name, company)
        }
        Commands::Certificate {
            name,
            company,
            format,
        } => commands::certificate::issue(config, name, company, format),
        Commands::Reset { yes } => commands::reset::execute(config, yes),
        Commands::Validate { catalog } => commands::validate::execute(config, catalog),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
