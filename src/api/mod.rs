//! Flow invocation: the completion-service seam and the runner that drives it.

mod completion;
mod error;
mod flow;
mod llm_bridge;
mod runner;
pub mod template;

pub use completion::{
    Completion, CompletionService, GenerationRequest, OutputShape, ToolDescriptor, ToolHandler,
    Turn,
};
pub use error::{FlowError, GenerationError, StoreError, ValidationError};
pub use flow::Flow;
pub use llm_bridge::{LlmCompletion, ProviderSettings};
pub use runner::{check_input, FlowRunner, MAX_TOOL_ROUNDS};
