//! Bridge between the completion seam and the `llm` crate.

use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, FunctionTool, StructuredOutputFormat, Tool};
use llm::LLMProvider;
use serde_json::json;
use std::str::FromStr;
use tracing::debug;

use super::completion::{
    Completion, CompletionService, GenerationRequest, OutputShape, ToolDescriptor, Turn,
};
use super::error::GenerationError;

const SYSTEM_PROMPT: &str = "You are NyayaGPT, a legal assistant for Indian law. \
Always answer with a single JSON value that matches the requested schema, without commentary.";

/// Connection settings for one hosted provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Backend name understood by `LLMBackend::from_str`, e.g. `openai`.
    pub backend: String,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// A [`CompletionService`] backed by an `llm` provider.
///
/// Temperature and the structured-output schema are builder options in
/// `llm`, so a provider is built for every request.
pub struct LlmCompletion {
    settings: ProviderSettings,
}

impl LlmCompletion {
    pub fn new(settings: ProviderSettings) -> Result<Self, String> {
        LLMBackend::from_str(&settings.backend)
            .map_err(|_| format!("Unknown provider: {}", settings.backend))?;
        Ok(Self { settings })
    }

    fn provider(&self, request: &GenerationRequest) -> Result<Box<dyn LLMProvider>, GenerationError> {
        let backend = LLMBackend::from_str(&self.settings.backend).map_err(|_| {
            GenerationError::Service(format!("Unknown provider: {}", self.settings.backend))
        })?;

        let mut builder = LLMBuilder::new()
            .backend(backend)
            .model(&self.settings.model)
            .system(SYSTEM_PROMPT)
            .schema(structured_format(&request.output)?);

        if let Some(api_key) = &self.settings.api_key {
            builder = builder.api_key(api_key);
        }
        if let Some(base_url) = &self.settings.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(secs) = self.settings.timeout_seconds {
            builder = builder.timeout_seconds(secs);
        }
        if let Some(temperature) = request.temperature {
            builder = builder.temperature(temperature);
        }

        Ok(builder.build()?)
    }
}

#[async_trait]
impl CompletionService for LlmCompletion {
    async fn generate(&self, request: &GenerationRequest) -> Result<Completion, GenerationError> {
        let provider = self.provider(request)?;
        let messages = chat_messages(&request.transcript);

        let response = match &request.tool {
            Some(descriptor) => {
                let tools = [tool_definition(descriptor)];
                provider.chat_with_tools(&messages, Some(&tools[..])).await?
            }
            None => provider.chat(&messages).await?,
        };

        if let Some(call) = response.tool_calls().and_then(|calls| calls.into_iter().next()) {
            debug!(flow = request.flow, tool = %call.function.name, "model requested tool");
            let arguments = serde_json::from_str(&call.function.arguments).map_err(|e| {
                GenerationError::MalformedResponse(format!("tool arguments: {}", e))
            })?;
            return Ok(Completion::ToolCall {
                name: call.function.name,
                arguments,
            });
        }

        response
            .text()
            .filter(|text| !text.trim().is_empty())
            .map(Completion::Text)
            .ok_or_else(|| GenerationError::MalformedResponse("empty response".to_string()))
    }
}

fn structured_format(shape: &OutputShape) -> Result<StructuredOutputFormat, GenerationError> {
    serde_json::from_value(json!({
        "name": shape.name,
        "description": shape.description,
        "schema": shape.schema,
    }))
    .map_err(|e| GenerationError::Service(format!("invalid output schema: {}", e)))
}

fn tool_definition(descriptor: &ToolDescriptor) -> Tool {
    Tool {
        tool_type: "function".to_string(),
        function: FunctionTool {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            parameters: descriptor.parameters.clone(),
        },
        cache_control: None,
    }
}

/// Flattens the transcript into chat messages. Tool traffic is replayed as
/// plain text so every backend can follow it.
fn chat_messages(transcript: &[Turn]) -> Vec<ChatMessage> {
    transcript
        .iter()
        .map(|turn| match turn {
            Turn::Prompt(text) => ChatMessage::user().content(text).build(),
            Turn::ToolCall { name, arguments } => ChatMessage::assistant()
                .content(format!("Calling tool `{}` with {}", name, arguments))
                .build(),
            Turn::ToolResult { name, content } => ChatMessage::user()
                .content(format!(
                    "Result of tool `{}`:\n{}\n\nNow answer in the required JSON format.",
                    name, content
                ))
                .build(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definition_is_a_function_tool() {
        let descriptor = ToolDescriptor {
            name: "search_catalog".to_string(),
            description: "Look up statutes and cases".to_string(),
            parameters: json!({
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"]
            }),
        };
        let tool = tool_definition(&descriptor);

        assert_eq!(tool.tool_type, "function");
        assert_eq!(tool.function.name, "search_catalog");
        assert_eq!(tool.function.parameters["required"], json!(["query"]));
        assert!(tool.cache_control.is_none());

        let wire = serde_json::to_value(&tool).unwrap();
        assert_eq!(wire["type"], "function");
        assert_eq!(wire["function"]["description"], "Look up statutes and cases");
    }

    #[test]
    fn output_shape_becomes_a_structured_format() {
        let shape = OutputShape {
            name: "research",
            description: "Case answer",
            schema: json!({ "type": "object" }),
        };
        let format = structured_format(&shape).unwrap();
        assert_eq!(format.name, "research");
        assert_eq!(format.schema, Some(json!({ "type": "object" })));
    }
}
