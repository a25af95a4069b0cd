//! quizkit CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizkit", version, about = "Quiz grading and difficulty estimation")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate quiz files
    Validate {
        /// Path to a quiz file or directory
        #[arg(long)]
        corpus: PathBuf,
    },

    /// List quizzes with their estimated time and difficulty
    List {
        /// Path to a quiz file or directory (default: corpus_dir from config)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Only show quizzes whose group starts with this prefix
        #[arg(long)]
        group: Option<String>,

        /// Print the group hierarchy instead of a table
        #[arg(long)]
        tree: bool,
    },

    /// Grade an attempt against its quiz
    Grade {
        /// Attempt JSON file
        #[arg(long)]
        attempt: PathBuf,

        /// Path to a quiz file or directory (default: corpus_dir from config)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Output format: text, json, markdown, html (default: from config)
        #[arg(long)]
        format: Option<String>,

        /// Directory to save the report in
        #[arg(long)]
        output: Option<PathBuf>,

        /// Save the report to output_dir from config
        #[arg(long)]
        save: bool,
    },

    /// Create starter config and example quiz
    Init,
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "quizkit=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { corpus } => commands::validate::execute(corpus),
        Commands::List {
            corpus,
            group,
            tree,
        } => commands::list::execute(corpus, group, tree, cli.config),
        Commands::Grade {
            attempt,
            corpus,
            format,
            output,
            save,
        } => commands::grade::execute(attempt, corpus, format, output, save, cli.config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
