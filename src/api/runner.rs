//! Executes flows against an injected completion service.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use super::completion::{Completion, CompletionService, GenerationRequest, ToolHandler, Turn};
use super::error::{FlowError, GenerationError, ValidationError};
use super::flow::Flow;

/// Upper bound on tool calls served within one invocation.
pub const MAX_TOOL_ROUNDS: usize = 3;

/// Runs flows. Cheap to clone; clones share the underlying service.
#[derive(Clone)]
pub struct FlowRunner {
    service: Arc<dyn CompletionService>,
}

impl FlowRunner {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    /// Validates the input, renders the prompt, calls the service and
    /// returns the validated output.
    pub async fn run<F: Flow>(&self, input: F::Input) -> Result<F::Output, FlowError> {
        self.execute::<F>(input, None).await
    }

    /// Like [`run`](Self::run), exposing `tool` to the model.
    pub async fn run_with_tool<F: Flow>(
        &self,
        input: F::Input,
        tool: &dyn ToolHandler,
    ) -> Result<F::Output, FlowError> {
        self.execute::<F>(input, Some(tool)).await
    }

    async fn execute<F: Flow>(
        &self,
        input: F::Input,
        tool: Option<&dyn ToolHandler>,
    ) -> Result<F::Output, FlowError> {
        let input = check_input::<F>(input)?;

        let prompt = F::render_prompt(&input);
        info!(flow = F::NAME, "running flow");
        debug!(flow = F::NAME, prompt_len = prompt.len(), "rendered prompt");

        let mut request = GenerationRequest {
            flow: F::NAME,
            transcript: vec![Turn::Prompt(prompt)],
            output: F::output_shape(),
            temperature: F::temperature(),
            tool: tool.map(|t| t.descriptor()),
        };

        let text = self.complete(&mut request, tool).await?;
        let output = parse_output::<F::Output>(F::NAME, &text)?;
        let output = F::finish(&input, output)?;

        info!(flow = F::NAME, "flow finished");
        Ok(output)
    }

    async fn complete(
        &self,
        request: &mut GenerationRequest,
        tool: Option<&dyn ToolHandler>,
    ) -> Result<String, GenerationError> {
        for round in 0..=MAX_TOOL_ROUNDS {
            match self.service.generate(request).await? {
                Completion::Text(text) => return Ok(text),
                Completion::ToolCall { name, arguments } => {
                    let handler = tool
                        .filter(|t| t.descriptor().name == name)
                        .ok_or_else(|| GenerationError::UnexpectedToolCall(name.clone()))?;
                    if round == MAX_TOOL_ROUNDS {
                        break;
                    }

                    debug!(flow = request.flow, tool = %name, round = round + 1, "serving tool call");
                    let content = handler.call(&arguments)?;
                    request.transcript.push(Turn::ToolCall {
                        name: name.clone(),
                        arguments,
                    });
                    request.transcript.push(Turn::ToolResult { name, content });
                }
            }
        }
        Err(GenerationError::ToolRoundsExceeded(MAX_TOOL_ROUNDS))
    }
}

/// Normalizes and validates `input` as [`FlowRunner::run`] would, without
/// needing a completion service.
pub fn check_input<F: Flow>(input: F::Input) -> Result<F::Input, FlowError> {
    let input = F::prepare(input)?;
    input.validate().map_err(ValidationError::from)?;
    Ok(input)
}

/// Parses a model response into `T` and validates it.
pub(crate) fn parse_output<T: DeserializeOwned + Validate>(
    shape: &str,
    text: &str,
) -> Result<T, GenerationError> {
    let value: T = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| GenerationError::MalformedResponse(format!("{}: {}", shape, e)))?;
    value.validate().map_err(|e| GenerationError::Shape {
        shape: shape.to_string(),
        reason: ValidationError::from(e).to_string(),
    })?;
    Ok(value)
}

/// Models often wrap JSON in a markdown fence; accept that.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}
