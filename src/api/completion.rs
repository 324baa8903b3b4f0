//! The seam between flows and the hosted completion service.

use async_trait::async_trait;
use serde_json::Value;

use super::error::GenerationError;

/// Describes the JSON value a flow expects back from the model.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputShape {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the expected object.
    pub schema: Value,
}

/// A function the model may call to fetch auxiliary data before answering.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON schema of the call arguments.
    pub parameters: Value,
}

/// One entry of the conversation sent to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    /// The rendered flow prompt.
    Prompt(String),
    /// A tool call previously made by the model.
    ToolCall { name: String, arguments: Value },
    /// The data returned to the model for that call.
    ToolResult { name: String, content: Value },
}

/// Everything a completion service needs for one generation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub flow: &'static str,
    pub transcript: Vec<Turn>,
    pub output: OutputShape,
    pub temperature: Option<f32>,
    pub tool: Option<ToolDescriptor>,
}

impl GenerationRequest {
    /// The rendered prompt that opened the conversation.
    pub fn prompt(&self) -> &str {
        self.transcript
            .iter()
            .find_map(|turn| match turn {
                Turn::Prompt(text) => Some(text.as_str()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// What the completion service produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The final answer, expected to hold JSON matching the output shape.
    Text(String),
    /// A request for auxiliary data through the attached tool.
    ToolCall { name: String, arguments: Value },
}

/// A hosted text-generation backend.
///
/// Implementations hold no per-call state; one instance may serve many
/// concurrent flow invocations.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Completion, GenerationError>;
}

/// Serves tool calls on behalf of a flow invocation.
pub trait ToolHandler: Send + Sync {
    fn descriptor(&self) -> ToolDescriptor;

    fn call(&self, arguments: &Value) -> Result<Value, GenerationError>;
}
