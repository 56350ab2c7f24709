//! Project metadata supplied by the user and the document that comes back.

/// Placeholder rendered for metadata the user left blank.
pub const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("project description must not be empty")]
    EmptyDescription,
}

/// What the user told us about the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    name: String,
    description: String,
    language: String,
    license: String,
}

impl ProjectDescriptor {
    /// Build a descriptor. Only the description is mandatory; the other fields
    /// may be empty and render as [`NOT_SPECIFIED`].
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        language: impl Into<String>,
        license: impl Into<String>,
    ) -> Result<Self, DescriptorError> {
        let description = description.into();
        // Control characters are dropped from prompts, so they do not count.
        if !description
            .chars()
            .any(|c| !c.is_whitespace() && !c.is_control())
        {
            return Err(DescriptorError::EmptyDescription);
        }
        Ok(Self {
            name: name.into().trim().to_string(),
            description,
            language: language.into().trim().to_string(),
            license: license.into().trim().to_string(),
        })
    }

    pub fn name(&self) -> &str {
        or_placeholder(&self.name)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn language(&self) -> &str {
        or_placeholder(&self.language)
    }

    pub fn license(&self) -> &str {
        or_placeholder(&self.license)
    }

    /// True when the user gave no language, so a scan guess may fill it in.
    pub fn language_unset(&self) -> bool {
        self.language.is_empty()
    }

    /// Return a copy with the language replaced.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into().trim().to_string();
        self
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        NOT_SPECIFIED
    } else {
        value
    }
}

/// Markdown returned by the completion endpoint. Opaque; written verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    text: String,
}

impl GeneratedDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// First `max_chars` characters, with an ellipsis when truncated.
    pub fn preview(&self, max_chars: usize) -> String {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &self.text[..idx]),
            None => self.text.clone(),
        }
    }
}
