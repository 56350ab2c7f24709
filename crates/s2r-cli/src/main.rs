//! CLI binary for snippet2readme: turn a one-line description into a README.

mod interactive;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use s2r_core::config::{ProcessEnv, S2rConfig, resolve_api_key};
use s2r_core::{ProjectDescriptor, readme_exists};
use s2r_gen::{GenerateRequest, PipelineError, create_provider, prepare_prompt, run_pipeline};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "snippet2readme",
    version,
    about = "Transform minimal project descriptions into comprehensive READMEs"
)]
struct Cli {
    /// Run in interactive mode (default when no name/description is given)
    #[arg(short, long)]
    interactive: bool,

    /// Project name
    #[arg(short, long)]
    name: Option<String>,

    /// One-sentence project description
    #[arg(short, long)]
    description: Option<String>,

    /// Primary programming language (detected from the scan if omitted)
    #[arg(short, long)]
    language: Option<String>,

    /// License type
    #[arg(long, default_value = "MIT")]
    license: String,

    /// Don't scan project files
    #[arg(long)]
    no_scan: bool,

    /// Project directory to scan (defaults to current directory)
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Directory to write the README into (defaults to current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// README file name (defaults to README.md)
    #[arg(long)]
    filename: Option<String>,

    /// Model identifier, overrides MODEL_NAME and the config file
    #[arg(short, long)]
    model: Option<String>,

    /// Overwrite an existing README without asking
    #[arg(short, long)]
    force: bool,

    /// Print the prompt that would be sent and exit
    #[arg(long)]
    print_prompt: bool,

    /// Hide the progress spinner
    #[arg(short, long)]
    quiet: bool,
}

/// Failures that belong to the command line rather than the pipeline.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{} already exists. Use --force to overwrite it.", .0.display())]
    ReadmeExists(PathBuf),
}

/// Outcome of collecting the project details.
struct Inputs {
    project: ProjectDescriptor,
    scan: bool,
    interactive: bool,
}

fn main() -> ExitCode {
    // A missing .env file is normal.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(pipeline) = err.downcast_ref::<PipelineError>() {
        return pipeline.exit_code();
    }
    match err.downcast_ref::<CliError>() {
        Some(CliError::ReadmeExists(_)) => 2,
        None => 1,
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("failed to get current directory")
}

fn run(cli: Cli) -> Result<()> {
    let project_root = match &cli.project {
        Some(p) => p.clone(),
        None => current_dir()?,
    };
    let output_dir = match &cli.output_dir {
        Some(p) => p.clone(),
        None => current_dir()?,
    };

    tracing::debug!(
        "project root {}, output dir {}",
        project_root.display(),
        output_dir.display()
    );

    let mut config = S2rConfig::load(&project_root, &ProcessEnv).map_err(PipelineError::from)?;
    if let Some(model) = &cli.model {
        config.llm.model.clone_from(model);
    }
    let filename = cli
        .filename
        .clone()
        .unwrap_or_else(|| config.output.filename.clone());

    let interactive = cli.interactive || (cli.name.is_none() && cli.description.is_none());
    if !interactive && (cli.name.is_none() || cli.description.is_none()) {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "--name and --description are required in non-interactive mode",
            )
            .exit();
    }
    if !cli.print_prompt {
        // Fail before asking any questions when the run cannot succeed.
        resolve_api_key(&ProcessEnv).map_err(PipelineError::from)?;
    }

    let Some(inputs) = collect_inputs(&cli, interactive)? else {
        println!("\nOperation cancelled.");
        return Ok(());
    };
    let scan_root = inputs.scan.then_some(project_root.as_path());

    if cli.print_prompt {
        return cmd_print_prompt(inputs.project, scan_root, &config);
    }

    if readme_exists(&output_dir, &filename) && !cli.force {
        if !inputs.interactive {
            return Err(CliError::ReadmeExists(output_dir.join(&filename)).into());
        }
        let overwrite = interactive::confirm(
            &mut io::stdin().lock(),
            &mut io::stdout(),
            &format!("{} already exists. Overwrite it?", filename),
            false,
        )?;
        if overwrite != Some(true) {
            println!("\nOperation cancelled.");
            return Ok(());
        }
    }

    cmd_generate(
        inputs.project,
        scan_root,
        &output_dir,
        &filename,
        &config,
        !cli.quiet,
    )
}

/// Gather project details from flags or interactively.
fn collect_inputs(cli: &Cli, interactive: bool) -> Result<Option<Inputs>> {
    if interactive {
        println!("{}", "=".repeat(60));
        println!("Snippet2README - AI-Powered README Generator");
        println!("{}", "=".repeat(60));
        println!();

        let answers = interactive::ask(&mut io::stdin().lock(), &mut io::stdout())?;
        let Some(answers) = answers else {
            return Ok(None);
        };
        let project = ProjectDescriptor::new(
            answers.name,
            answers.description,
            answers.language,
            answers.license,
        )
        .map_err(PipelineError::from)?;
        return Ok(Some(Inputs {
            project,
            scan: answers.scan,
            interactive: true,
        }));
    }

    let project = ProjectDescriptor::new(
        cli.name.clone().unwrap_or_default(),
        cli.description.clone().unwrap_or_default(),
        cli.language.clone().unwrap_or_default(),
        cli.license.as_str(),
    )
    .map_err(PipelineError::from)?;

    Ok(Some(Inputs {
        project,
        scan: !cli.no_scan,
        interactive: false,
    }))
}

fn cmd_print_prompt(
    project: ProjectDescriptor,
    scan_root: Option<&Path>,
    config: &S2rConfig,
) -> Result<()> {
    let (_, prompt, _) = prepare_prompt(project, scan_root, config);
    let mut out = io::stdout().lock();
    writeln!(out, "--- system ---\n{}\n", prompt.system)?;
    writeln!(out, "--- user ---\n{}", prompt.user)?;
    Ok(())
}

fn cmd_generate(
    project: ProjectDescriptor,
    scan_root: Option<&Path>,
    output_dir: &Path,
    filename: &str,
    config: &S2rConfig,
    show_progress: bool,
) -> Result<()> {
    let request = GenerateRequest {
        project,
        scan_root,
        output_dir,
        filename,
        show_progress,
    };

    let report = run_pipeline(request, config, &ProcessEnv, create_provider)?;

    if let Some(hints) = report.scan_hints {
        eprintln!("  Scan hints used: {}", hints);
    }
    println!("\n{} generated successfully with {}!", filename, report.model);
    println!("Saved to: {}", report.path.display());
    println!("\nPreview:");
    println!("{}", "-".repeat(60));
    println!("{}", report.document.preview(config.output.preview_chars));
    println!("{}", "-".repeat(60));
    Ok(())
}
