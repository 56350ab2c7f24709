//! End-to-end README generation: credentials → scan → prompt → completion → write.
//!
//! The credential and output-target checks run first so a missing key or an
//! unwritable target fails before any scan or network call.

use crate::client::CompletionClient;
use crate::progress::RequestSpinner;
use crate::provider::{CompletionError, LlmProvider};
use s2r_core::config::{ConfigError, ConfigSource, LlmConfig, S2rConfig, resolve_api_key};
use s2r_core::{
    DescriptorError, GeneratedDocument, ProjectDescriptor, PromptBuilder, PromptPair, WriteError,
    check_target, scan_or_empty, write_readme,
};
use std::path::{Path, PathBuf};

/// Inputs for one generation run.
pub struct GenerateRequest<'a> {
    pub project: ProjectDescriptor,
    /// Directory to scan for hints; `None` skips scanning.
    pub scan_root: Option<&'a Path>,
    pub output_dir: &'a Path,
    pub filename: &'a str,
    /// Show a spinner while waiting on the provider.
    pub show_progress: bool,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct GenerateReport {
    pub path: PathBuf,
    pub document: GeneratedDocument,
    pub model: String,
    /// Number of scan hints fed to the prompt, `None` when scanning was skipped.
    pub scan_hints: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("failed to generate README: {0}")]
    Completion(#[from] CompletionError),
    #[error("failed to save README: {0}")]
    Write(#[from] WriteError),
}

impl PipelineError {
    /// Process exit code for this failure kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Descriptor(_) => 2,
            Self::Completion(CompletionError::Authentication(_)) => 3,
            Self::Completion(CompletionError::RateLimit(_)) => 4,
            Self::Completion(CompletionError::Network(_)) => 5,
            Self::Completion(CompletionError::EmptyResponse) => 6,
            Self::Completion(CompletionError::Api { .. } | CompletionError::Parse(_)) => 1,
            Self::Write(_) => 7,
        }
    }
}

/// Scan (if requested) and build the prompt pair.
///
/// Returns the descriptor actually used, which picks up the scan's language
/// guess when the user gave none.
pub fn prepare_prompt(
    project: ProjectDescriptor,
    scan_root: Option<&Path>,
    config: &S2rConfig,
) -> (ProjectDescriptor, PromptPair, Option<usize>) {
    let scan = scan_root.map(|root| scan_or_empty(root, &config.scan));

    let project = match scan.as_ref().and_then(|s| s.primary_language()) {
        Some(language) if project.language_unset() => {
            tracing::info!("using detected language: {}", language);
            project.with_language(language)
        }
        _ => project,
    };

    let builder = match &config.prompt.system_prompt {
        Some(custom) => PromptBuilder::with_system_prompt(custom.clone()),
        None => PromptBuilder::new(),
    };
    let prompt = builder.build(&project, scan.as_ref());
    let hint_count = scan.as_ref().map(|s| s.len());
    (project, prompt, hint_count)
}

/// Run the full pipeline.
///
/// `connect` turns the resolved API key into a provider; the CLI passes
/// [`crate::provider::create_provider`], tests pass fakes.
pub fn run_pipeline<F>(
    request: GenerateRequest<'_>,
    config: &S2rConfig,
    source: &dyn ConfigSource,
    connect: F,
) -> Result<GenerateReport, PipelineError>
where
    F: FnOnce(String, &LlmConfig) -> Box<dyn LlmProvider>,
{
    let api_key = resolve_api_key(source)?;
    check_target(request.output_dir, request.filename)?;

    let (_, prompt, scan_hints) = prepare_prompt(request.project, request.scan_root, config);

    let provider = connect(api_key, &config.llm);
    let client = CompletionClient::new(provider.as_ref());
    let model = client.model_name().to_string();

    let spinner = if request.show_progress {
        RequestSpinner::start(&format!("Generating README with {}...", model))
    } else {
        RequestSpinner::hidden()
    };
    let generated = client.generate(&prompt);
    spinner.finish();
    let document = generated?;

    let path = write_readme(&document, request.output_dir, request.filename)?;

    Ok(GenerateReport {
        path,
        document,
        model,
        scan_hints,
    })
}
