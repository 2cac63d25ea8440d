//! Named-placeholder prompt templates and the stage type built on them
//!
//! Templates use `{name}` placeholders; `{{` and `}}` produce literal braces.

use crate::llm::LLMClient;
use crate::types::{AppError, Result};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(String),
}

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    name: String,
    segments: Vec<Segment>,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    /// Parse `template`.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidInput`] on an unterminated `{`, a stray `}`, or a
    /// placeholder that is not an identifier.
    pub fn new(name: impl Into<String>, template: &str) -> Result<Self> {
        let name = name.into();
        let mut segments = Vec::new();
        let mut input_variables: Vec<String> = Vec::new();
        let mut text = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut placeholder = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => placeholder.push(ch),
                            None => {
                                return Err(AppError::InvalidInput(format!(
                                    "Template '{}' has an unterminated placeholder",
                                    name
                                )));
                            }
                        }
                    }
                    if !is_identifier(&placeholder) {
                        return Err(AppError::InvalidInput(format!(
                            "Template '{}' has an invalid placeholder '{{{}}}'",
                            name, placeholder
                        )));
                    }
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    if !input_variables.contains(&placeholder) {
                        input_variables.push(placeholder.clone());
                    }
                    segments.push(Segment::Placeholder(placeholder));
                }
                '}' => {
                    return Err(AppError::InvalidInput(format!(
                        "Template '{}' has an unmatched '}}'",
                        name
                    )));
                }
                other => text.push(other),
            }
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            name,
            segments,
            input_variables,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placeholder names in order of first appearance
    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Substitute every placeholder. Extra inputs are ignored.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidInput`] naming the first missing placeholder.
    pub fn render(&self, inputs: &HashMap<&str, &str>) -> Result<String> {
        if let Some(missing) = self
            .input_variables
            .iter()
            .find(|var| !inputs.contains_key(var.as_str()))
        {
            return Err(AppError::InvalidInput(format!(
                "Missing input '{}' for prompt '{}'",
                missing, self.name
            )));
        }

        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => rendered.push_str(text),
                Segment::Placeholder(var) => rendered.push_str(inputs[var.as_str()]),
            }
        }
        Ok(rendered)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A template bound to a language model
///
/// Invoking a stage renders the template and returns the model's raw output.
/// Stages never retry and never validate what the model returns.
#[derive(Clone)]
pub struct PromptStage {
    template: PromptTemplate,
    llm: Arc<dyn LLMClient>,
}

impl PromptStage {
    pub fn new(template: PromptTemplate, llm: Arc<dyn LLMClient>) -> Self {
        Self { template, llm }
    }

    pub fn name(&self) -> &str {
        self.template.name()
    }

    pub async fn invoke(&self, inputs: &HashMap<&str, &str>) -> Result<String> {
        let prompt = self.template.render(inputs)?;
        tracing::debug!(
            stage = self.name(),
            model = self.llm.model_name(),
            prompt_chars = prompt.len(),
            "Invoking prompt stage"
        );
        self.llm.generate(&prompt).await
    }
}
