//! The contract every flow implements.

use serde::de::DeserializeOwned;
use validator::Validate;

use super::completion::OutputShape;
use super::error::{FlowError, GenerationError};

/// A named, input-validated, output-validated call to the completion service.
///
/// Flows are stateless marker types; everything they need arrives in the
/// input value.
pub trait Flow {
    const NAME: &'static str;

    type Input: Validate + Send + Sync;
    type Output: DeserializeOwned + Validate + Send;

    /// Renders the prompt for a validated input. Must be pure.
    fn render_prompt(input: &Self::Input) -> String;

    fn output_shape() -> OutputShape;

    fn temperature() -> Option<f32> {
        None
    }

    /// Normalizes the input and enforces rules spanning several fields.
    /// Runs before field validation.
    fn prepare(input: Self::Input) -> Result<Self::Input, FlowError> {
        Ok(input)
    }

    /// Post-conditions the parsed output must meet beyond its shape.
    fn finish(_input: &Self::Input, output: Self::Output) -> Result<Self::Output, GenerationError> {
        Ok(output)
    }
}
