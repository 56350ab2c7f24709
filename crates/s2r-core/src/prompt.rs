//! Prompt construction for README generation.
//!
//! The system prompt is a static template. The user prompt wraps every
//! user-supplied value in a `<<<BEGIN X>>>` / `<<<END X>>>` block so that
//! instructions smuggled into a description stay data. Request payload
//! escaping is left to the JSON serializer in the completion client.

use crate::descriptor::ProjectDescriptor;
use crate::scan::ScanResult;

/// Built-in system prompt: required README sections, tone and output rules.
pub const DEFAULT_SYSTEM_PROMPT: &str = include_str!("prompts/readme_system.md");

/// System and user instructions for one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Builds [`PromptPair`]s from project metadata.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_prompt: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Use a custom system prompt in place of [`DEFAULT_SYSTEM_PROMPT`].
    pub fn with_system_prompt(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    /// Build the prompt pair.
    ///
    /// `scan` is `None` when scanning was skipped and `Some` (possibly empty)
    /// when a scan ran, so the model can be told "nothing found" explicitly.
    pub fn build(&self, project: &ProjectDescriptor, scan: Option<&ScanResult>) -> PromptPair {
        let mut user = String::from(
            "Create a professional README.md for the project described in the blocks below.\n",
        );

        push_block(&mut user, "PROJECT NAME", project.name());
        push_block(&mut user, "DESCRIPTION", project.description());
        push_block(&mut user, "PRIMARY LANGUAGE", project.language());
        push_block(&mut user, "LICENSE", project.license());

        match scan {
            Some(result) if !result.is_empty() => {
                let listing = result
                    .hints()
                    .map(|hint| format!("- {}", hint))
                    .collect::<Vec<_>>()
                    .join("\n");
                push_block(&mut user, "DETECTED PROJECT FILES/TECHNOLOGIES", &listing);
            }
            Some(_) => {
                user.push_str(
                    "\nThe project directory was scanned but no notable files or technologies were detected.\n",
                );
            }
            None => {}
        }

        PromptPair {
            system: self.system_prompt.clone(),
            user,
        }
    }
}

fn push_block(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(
        "\n<<<BEGIN {label}>>>\n{}\n<<<END {label}>>>\n",
        neutralize(value)
    ));
}

/// Strip control characters (newlines and tabs survive) and break up any
/// `<<<` / `>>>` run so user text cannot open or close a block.
fn neutralize(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    let mut out = cleaned;
    while out.contains("<<<") || out.contains(">>>") {
        out = out.replace("<<<", "< <<").replace(">>>", ">> >");
    }
    out
}
