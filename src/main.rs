//! isoltest-extract CLI - Command-line interface
//!
//! Commands:
//!   run     - Migrate every extractable test and write the files
//!   check   - Report which tests are extractable, write nothing
//!   render  - Print the migrated file for a single test

use clap::{Parser, Subcommand};
use isoltest_extract::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "isoltest-extract",
    version,
    about = "Migrate end-to-end test cases into isoltest semantic tests."
)]
struct Args {
    /// Log progress (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Migrate every extractable test and write the files.
    Run {
        /// The C++ test source to migrate.
        #[arg(required = true)]
        file: PathBuf,
        /// Root of the extracted test tree.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Category directory below the output root.
        #[arg(long)]
        category: Option<PathBuf>,
        /// Config file (default: ./extract.yaml if present).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Report which tests are extractable without writing anything.
    Check {
        /// The C++ test source to inspect.
        #[arg(required = true)]
        file: PathBuf,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
        /// List the call lines of extractable tests.
        #[arg(long)]
        calls: bool,
    },
    /// Print the migrated file for one test.
    Render {
        /// The C++ test source containing the test.
        #[arg(required = true)]
        file: PathBuf,
        /// Name of the test case.
        #[arg(required = true)]
        name: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Command::Run {
            file,
            output,
            category,
            config,
            json,
        } => cmd_run(&file, output, category, config.as_deref(), json),
        Command::Check { file, json, calls } => cmd_check(&file, json, calls),
        Command::Render { file, name } => cmd_render(&file, &name),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<MigrateConfig> {
    match path {
        Some(p) => MigrateConfig::load(p),
        None => Ok(MigrateConfig::load_from_dir(Path::new("."))?.unwrap_or_default()),
    }
}

fn cmd_run(
    file: &Path,
    output: Option<PathBuf>,
    category: Option<PathBuf>,
    config: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(root) = output {
        config.output.root = root;
    }
    if let Some(category) = category {
        config.output.category = category;
    }

    let source = fs::read_to_string(file)?;
    let report = migrate(&source, &config.layout())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.summary);
    }
    Ok(())
}

fn cmd_check(file: &Path, json: bool, calls: bool) -> Result<()> {
    let source = fs::read_to_string(file)?;
    let report = check(&source);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.to_report(calls));
    }
    Ok(())
}

fn cmd_render(file: &Path, name: &str) -> Result<()> {
    let source = fs::read_to_string(file)?;
    let test = analyse(&source)
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| Error::UnknownTest(name.to_string()))?;

    match render(&test) {
        Some(content) => {
            print!("{}", content);
            Ok(())
        }
        None => {
            let reasons = test
                .eligibility
                .reasons()
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            Err(format!("{} is not extractable: {}", name, reasons).into())
        }
    }
}
