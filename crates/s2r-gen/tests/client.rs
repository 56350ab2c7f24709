//! Completion client behaviour against fake providers.

use s2r_core::{ProjectDescriptor, PromptBuilder, PromptPair};
use s2r_gen::{CompletionClient, CompletionError, LlmProvider, LlmResponse};
use std::cell::RefCell;

/// Returns a canned result and records what it was asked.
struct ScriptedProvider {
    reply: RefCell<Option<Result<LlmResponse, CompletionError>>>,
    seen: RefCell<Vec<(String, String)>>,
}

impl ScriptedProvider {
    fn replying(text: &str) -> Self {
        Self::with(Ok(LlmResponse {
            text: text.to_string(),
            input_tokens: Some(10),
            output_tokens: Some(20),
        }))
    }

    fn with(reply: Result<LlmResponse, CompletionError>) -> Self {
        Self {
            reply: RefCell::new(Some(reply)),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl LlmProvider for ScriptedProvider {
    fn complete(&self, system: &str, user: &str) -> Result<LlmResponse, CompletionError> {
        self.seen
            .borrow_mut()
            .push((system.to_string(), user.to_string()));
        self.reply
            .borrow_mut()
            .take()
            .expect("provider called more than once")
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn prompt() -> PromptPair {
    let project = ProjectDescriptor::new("demo", "A demo project", "Rust", "MIT").unwrap();
    PromptBuilder::new().build(&project, None)
}

#[test]
fn test_returns_text_unmodified() {
    let raw = "\n\n# Demo\n\nSome *markdown*   \n";
    let provider = ScriptedProvider::replying(raw);
    let doc = CompletionClient::new(&provider).generate(&prompt()).unwrap();
    assert_eq!(doc.as_str(), raw);
}

#[test]
fn test_sends_system_and_user_from_prompt_pair() {
    let provider = ScriptedProvider::replying("# ok");
    let pair = prompt();
    CompletionClient::new(&provider).generate(&pair).unwrap();

    let seen = provider.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, pair.system);
    assert_eq!(seen[0].1, pair.user);
}

#[test]
fn test_empty_string_is_empty_response_error() {
    let provider = ScriptedProvider::replying("");
    let err = CompletionClient::new(&provider)
        .generate(&prompt())
        .unwrap_err();
    assert!(matches!(err, CompletionError::EmptyResponse));
}

#[test]
fn test_whitespace_only_is_empty_response_error() {
    let provider = ScriptedProvider::replying(" \n\t \n");
    assert!(matches!(
        CompletionClient::new(&provider).generate(&prompt()),
        Err(CompletionError::EmptyResponse)
    ));
}

#[test]
fn test_provider_errors_pass_through() {
    let provider = ScriptedProvider::with(Err(CompletionError::RateLimit("slow down".into())));
    assert!(matches!(
        CompletionClient::new(&provider).generate(&prompt()),
        Err(CompletionError::RateLimit(_))
    ));

    let provider = ScriptedProvider::with(Err(CompletionError::Network("refused".into())));
    assert!(matches!(
        CompletionClient::new(&provider).generate(&prompt()),
        Err(CompletionError::Network(_))
    ));
}

#[test]
fn test_model_name_exposed() {
    let provider = ScriptedProvider::replying("# ok");
    assert_eq!(CompletionClient::new(&provider).model_name(), "scripted");
}
