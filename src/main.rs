//! daxgen CLI - DAX workflow generator

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use daxgen::error::{DaxError, FixSuggestion};
use daxgen::{Adag, Workflow, WORKFLOW_SCHEMA};

#[derive(Parser)]
#[command(name = "daxgen")]
#[command(about = "daxgen - abstract workflow DAG authoring and DAX generation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a DAX XML document from a workflow file
    Generate {
        /// Path to .dax.yaml workflow file
        file: String,

        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a workflow file without writing output
    Validate {
        /// Path to .dax.yaml workflow file
        file: String,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { file, output } => generate(&file, output.as_deref()),
        Commands::Validate { file } => validate(&file),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

/// Read, parse, compile and validate a workflow file
fn load(file: &str) -> Result<Adag, DaxError> {
    let yaml = fs::read_to_string(file)?;
    let workflow: Workflow = serde_yaml::from_str(&yaml)?;

    if workflow.schema != WORKFLOW_SCHEMA {
        return Err(DaxError::SchemaMismatch {
            expected: WORKFLOW_SCHEMA.to_string(),
            found: workflow.schema.clone(),
        });
    }

    let adag = Adag::from_workflow(&workflow)?;
    adag.validate()?;
    info!(file, jobs = adag.job_count(), "loaded workflow");
    Ok(adag)
}

fn generate(file: &str, output: Option<&Path>) -> Result<(), DaxError> {
    let adag = load(file)?;
    let xml = adag.to_xml_string();

    match output {
        Some(path) => {
            fs::write(path, &xml)?;
            info!(path = %path.display(), bytes = xml.len(), "wrote DAX document");
            println!(
                "{} Wrote {} ({} jobs, {} dependencies)",
                "✓".green(),
                path.display(),
                adag.job_count(),
                adag.dependency_count()
            );
        }
        None => print!("{xml}"),
    }

    Ok(())
}

fn validate(file: &str) -> Result<(), DaxError> {
    let adag = load(file)?;
    let order = adag.graph().topological_order()?;
    let order: Vec<&str> = order
        .iter()
        .map(|id| {
            adag.job(id)
                .map(|job| job.name.as_str())
                .unwrap_or(id.as_ref())
        })
        .collect();

    println!("{} Workflow '{}' is valid", "✓".green(), file);
    println!("  Name: {}", adag.name.cyan());
    println!("  Jobs: {}", adag.job_count());
    println!("  Dependencies: {}", adag.dependency_count());
    println!("  Order: {}", order.join(" → "));

    Ok(())
}
