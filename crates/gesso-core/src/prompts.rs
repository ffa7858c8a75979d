//! Prompt library for the semantic-extraction backends
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/gesso/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Users can tune the wording sent to their local model without rebuilding.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const EXTRACT_EVENTS: &str = include_str!("../../../prompts/extract_events.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Re-read inconclusive spans and return structured events
    ExtractEvents,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExtractEvents => "extract_events",
        }
    }

    pub fn all() -> &'static [PromptId] {
        &[Self::ExtractEvents]
    }

    /// Variables the caller fills in when rendering this prompt
    pub fn supplied_variables(&self) -> &'static [&'static str] {
        match self {
            Self::ExtractEvents => &["message", "flagged_spans"],
        }
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::ExtractEvents => defaults::EXTRACT_EVENTS,
        }
    }
}

impl std::str::FromStr for PromptId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("Unknown prompt: {}", s))
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    /// Bumped whenever the wording changes
    pub version: u32,
    pub task_type: String,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    /// Body after the frontmatter (system + user sections)
    pub content: String,
    pub is_override: bool,
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the whole body with template variables replaced
    pub fn render(&self, vars: &HashMap<&str, &str>) -> String {
        render_template(&self.content, vars)
    }

    /// Render just the user section (or the whole body if it has none)
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        match self.user_section() {
            Some(user) => render_template(user, vars),
            None => self.render(vars),
        }
    }

    pub fn render_system(&self, vars: &HashMap<&str, &str>) -> Option<String> {
        self.system_section().map(|s| render_template(s, vars))
    }

    /// Placeholder and conditional names used in the body, sorted, no duplicates
    pub fn variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut rest = self.content.as_str();
        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                break;
            };
            let tag = after[..end].trim();
            let name = tag.strip_prefix("#if ").unwrap_or(tag).trim();
            if !name.is_empty() && !name.starts_with('/') && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
            rest = &after[end + 2..];
        }
        names.sort();
        names
    }
}

/// Prompt library for loading and caching prompts
pub struct PromptLibrary {
    override_dir: Option<PathBuf>,
    cache: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Create a new prompt library with default paths
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
            cache: HashMap::new(),
        }
    }

    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Get a prompt by ID, loading from override or default
    pub fn get(&mut self, id: PromptId) -> Result<&Prompt> {
        if !self.cache.contains_key(&id) {
            let prompt = self.load(id)?;
            self.cache.insert(id, prompt);
        }
        self.cache
            .get(&id)
            .ok_or_else(|| Error::InvalidData(format!("Prompt {} not cached", id.as_str())))
    }

    fn load(&self, id: PromptId) -> Result<Prompt> {
        if let Some(override_path) = self.override_path(id).filter(|p| p.exists()) {
            let content = fs::read_to_string(&override_path).map_err(|e| {
                Error::InvalidData(format!("Failed to read prompt override: {}", e))
            })?;
            let (metadata, body) = parse_prompt(&content)?;
            return Ok(Prompt {
                metadata,
                content: body,
                is_override: true,
                override_path: Some(override_path),
            });
        }

        let (metadata, body) = parse_prompt(id.default_content())?;
        Ok(Prompt {
            metadata,
            content: body,
            is_override: false,
            override_path: None,
        })
    }

    /// List all prompts with their override status
    pub fn list(&mut self) -> Vec<PromptInfo> {
        PromptId::all()
            .iter()
            .map(|&id| {
                let has_override = self.has_override(id);
                let override_path = if has_override {
                    self.override_path(id)
                } else {
                    None
                };
                let prompt = self.get(id).ok();
                let unknown_variables = prompt
                    .map(|p| {
                        p.variables()
                            .into_iter()
                            .filter(|v| !id.supplied_variables().contains(&v.as_str()))
                            .collect()
                    })
                    .unwrap_or_default();
                PromptInfo {
                    id: id.as_str().to_string(),
                    version: prompt.map(|p| p.metadata.version).unwrap_or(0),
                    task_type: prompt
                        .map(|p| p.metadata.task_type.clone())
                        .unwrap_or_default(),
                    has_override,
                    override_path,
                    unknown_variables,
                }
            })
            .collect()
    }

    pub fn has_override(&self, id: PromptId) -> bool {
        self.override_path(id).is_some_and(|p| p.exists())
    }

    fn override_path(&self, id: PromptId) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|d| d.join(format!("{}.md", id.as_str())))
    }

    pub fn override_dir(&self) -> Option<&PathBuf> {
        self.override_dir.as_ref()
    }

    /// Clear the cache (useful after editing override files)
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Information about a prompt for listing
#[derive(Debug, Clone)]
pub struct PromptInfo {
    pub id: String,
    pub version: u32,
    pub task_type: String,
    pub has_override: bool,
    pub override_path: Option<PathBuf>,
    /// Placeholders nobody fills in; they reach the model verbatim
    pub unknown_variables: Vec<String>,
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("gesso").join("prompts").join("overrides"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    let rest = content.strip_prefix("---").ok_or_else(|| {
        Error::InvalidData("Prompt must start with YAML frontmatter (---)".into())
    })?;

    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];

    let end = after_header.find("\n# ").unwrap_or(after_header.len());

    Some(after_header[..end].trim())
}

/// Resolve conditionals, then substitute `{{var}}` placeholders.
///
/// Conditionals go first so substituted values are never parsed as template
/// syntax.
fn render_template(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut result = resolve_conditionals(template, vars);
    for (key, value) in vars {
        let pattern = format!("{{{{{}}}}}", key);
        result = result.replace(&pattern, value);
    }
    result
}

/// Keep `{{#if var}}...{{/if}}` bodies whose variable is non-empty, drop the rest
fn resolve_conditionals(content: &str, vars: &HashMap<&str, &str>) -> String {
    let mut result = content.to_string();

    while let Some(if_start) = result.find("{{#if ") {
        let var_start = if_start + 6;
        let Some(var_end) = result[var_start..].find("}}") else {
            break;
        };
        let var_name = result[var_start..var_start + var_end].trim();
        let block_start = var_start + var_end + 2;

        let Some(endif_pos) = result[block_start..].find("{{/if}}") else {
            break;
        };
        let block_content = &result[block_start..block_start + endif_pos];
        let full_end = block_start + endif_pos + 7;

        let keep = vars.get(var_name).is_some_and(|v| !v.is_empty());
        result = if keep {
            format!(
                "{}{}{}",
                &result[..if_start],
                block_content,
                &result[full_end..]
            )
        } else {
            format!("{}{}", &result[..if_start], &result[full_end..])
        };
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt() {
        let content = r#"---
id: test_prompt
version: 1
task_type: structured_extraction
---

# System
Test system prompt.

# User
Test user prompt with {{variable}}.
"#;

        let (metadata, body) = parse_prompt(content).unwrap();
        assert_eq!(metadata.id, "test_prompt");
        assert_eq!(metadata.version, 1);
        assert_eq!(metadata.task_type, "structured_extraction");
        assert!(body.contains("# System"));
        assert!(body.contains("# User"));
    }

    #[test]
    fn test_parse_prompt_requires_frontmatter() {
        assert!(parse_prompt("# System\nhello").is_err());
        assert!(parse_prompt("---\nid: x\n# System").is_err());
    }

    #[test]
    fn test_extract_section() {
        let content = "# System\nSystem content here.\n\n# User\nUser content here.";

        assert_eq!(
            extract_section(content, "# System"),
            Some("System content here.")
        );
        assert_eq!(extract_section(content, "# User"), Some("User content here."));
    }

    #[test]
    fn test_conditional_blocks() {
        let content = "Start{{#if spans}}\nSpans: {{spans}}{{/if}}\nEnd";

        let mut vars = HashMap::new();
        vars.insert("spans", "- \"paguei 500\"");
        let result = render_template(content, &vars);
        assert!(result.contains("Spans: - \"paguei 500\""));

        let empty_vars: HashMap<&str, &str> = HashMap::new();
        let result = render_template(content, &empty_vars);
        assert!(!result.contains("Spans:"));
        assert!(result.contains("Start"));
        assert!(result.contains("End"));
    }

    #[test]
    fn test_values_are_not_template_syntax() {
        let mut vars = HashMap::new();
        vars.insert("message", "{{#if x}}oops{{/if}}");
        let result = render_template("Msg: {{message}}", &vars);
        assert_eq!(result, "Msg: {{#if x}}oops{{/if}}");
    }

    #[test]
    fn test_embedded_extract_events_prompt() {
        let mut lib = PromptLibrary::embedded_only();
        let prompt = lib.get(PromptId::ExtractEvents).unwrap();
        assert!(!prompt.is_override);
        assert_eq!(prompt.metadata.id, "extract_events");
        assert_eq!(prompt.metadata.task_type, "structured_extraction");

        let mut vars = HashMap::new();
        vars.insert("message", "Paguei 500 hoje.");
        vars.insert("flagged_spans", "- \"Paguei 500 hoje\"");
        let user = prompt.render_user(&vars);
        assert!(user.contains("Paguei 500 hoje."));
        assert!(user.contains("- \"Paguei 500 hoje\""));
        assert!(!user.contains("{{"));

        let system = prompt.render_system(&vars).unwrap();
        assert!(system.contains("despesa_servico"));
        assert!(system.contains("internet_telefone"));
    }

    #[test]
    fn test_override_dir_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("extract_events.md"),
            "---\nid: extract_events\nversion: 7\ntask_type: structured_extraction\n---\n# User\nCustom {{message}}",
        )
        .unwrap();

        let mut lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        assert!(lib.has_override(PromptId::ExtractEvents));
        let prompt = lib.get(PromptId::ExtractEvents).unwrap();
        assert!(prompt.is_override);
        assert_eq!(prompt.metadata.version, 7);

        let listed = lib.list();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].has_override);
        assert_eq!(listed[0].version, 7);
        assert!(listed[0].unknown_variables.is_empty());
    }

    #[test]
    fn test_embedded_prompt_uses_only_supplied_variables() {
        let mut lib = PromptLibrary::embedded_only();
        let prompt = lib.get(PromptId::ExtractEvents).unwrap();
        let vars = prompt.variables();
        assert!(vars.contains(&"message".to_string()));
        for var in &vars {
            assert!(PromptId::ExtractEvents.supplied_variables().contains(&var.as_str()));
        }
        assert!(lib.list()[0].unknown_variables.is_empty());
    }

    #[test]
    fn test_override_with_unknown_variable_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("extract_events.md"),
            "---\nid: extract_events\nversion: 2\ntask_type: structured_extraction\n---\n# User\n{{#if cliente}}Cliente: {{cliente}}{{/if}}\n{{message}} {{ message }}",
        )
        .unwrap();

        let mut lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        assert_eq!(
            lib.get(PromptId::ExtractEvents).unwrap().variables(),
            ["cliente", "message"]
        );
        assert_eq!(lib.list()[0].unknown_variables, ["cliente"]);
    }

    #[test]
    fn test_prompt_id_from_str() {
        assert_eq!(
            "extract_events".parse::<PromptId>().unwrap(),
            PromptId::ExtractEvents
        );
        assert!("classify_merchant".parse::<PromptId>().is_err());
    }
}
