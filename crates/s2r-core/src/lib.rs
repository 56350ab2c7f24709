//! Core types for snippet2readme.
//!
//! Provides the project descriptor ([`descriptor::ProjectDescriptor`]), layered
//! configuration, the shallow directory scanner, the prompt builder and the
//! README writer. Nothing in this crate touches the network.

pub mod config;
pub mod descriptor;
pub mod prompt;
pub mod scan;
pub mod writer;

pub use config::{ConfigError, ConfigSource, ProcessEnv, S2rConfig};
pub use descriptor::{DescriptorError, GeneratedDocument, NOT_SPECIFIED, ProjectDescriptor};
pub use prompt::{DEFAULT_SYSTEM_PROMPT, PromptBuilder, PromptPair};
pub use scan::{ScanError, ScanResult, scan_or_empty, scan_project};
pub use writer::{DEFAULT_README_NAME, WriteError, check_target, readme_exists, write_readme};
