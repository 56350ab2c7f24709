//! README completion client on top of an [`LlmProvider`].

use crate::provider::{CompletionError, LlmProvider};
use s2r_core::{GeneratedDocument, PromptPair};

/// Sends one prompt pair and hands back the generated README text.
///
/// No retries and no post-processing: whatever non-blank text the provider
/// returns becomes the document.
pub struct CompletionClient<'a> {
    provider: &'a dyn LlmProvider,
}

impl<'a> CompletionClient<'a> {
    pub fn new(provider: &'a dyn LlmProvider) -> Self {
        Self { provider }
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    pub fn generate(&self, prompt: &PromptPair) -> Result<GeneratedDocument, CompletionError> {
        tracing::info!(
            "requesting README from {} ({} prompt chars)",
            self.provider.model_name(),
            prompt.system.len() + prompt.user.len()
        );

        let response = self.provider.complete(&prompt.system, &prompt.user)?;

        if response.text.trim().is_empty() {
            return Err(CompletionError::EmptyResponse);
        }

        match (response.input_tokens, response.output_tokens) {
            (Some(input), Some(output)) => {
                tracing::info!("token usage: {} input, {} output", input, output);
            }
            _ => tracing::debug!("provider did not report token usage"),
        }

        Ok(GeneratedDocument::new(response.text))
    }
}
