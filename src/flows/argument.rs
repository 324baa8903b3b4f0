//! Drafting of structured legal arguments citing Indian authorities.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use validator::Validate;

use super::{blank_to_none, check_document, document_text};
use crate::api::template::render_template;
use crate::api::{Flow, FlowError, OutputShape};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentInput {
    #[validate(length(min = 20, message = "Prompt must be at least 20 characters."))]
    pub prompt: Option<String>,
    pub context_data_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ArgumentOutput {
    #[validate(length(min = 1))]
    pub argument: String,
}

const TEMPLATE: &str = r#"You are an AI legal assistant specializing in Indian law. Draft a structured legal argument for the situation below. Cite the relevant Indian legal authorities, such as the Constitution of India, IPC, CrPC, CPC, Evidence Act, Contract Act, Companies Act, SEBI regulations, RBI circulars, and Supreme Court and High Court judgments.

Treat the provided document as the primary context when it is present.

{{#if document}}
Document Context:
{{document}}
{{/if}}

{{#if prompt}}
Prompt: {{prompt}}
{{/if}}

Respond with a JSON object with a single field "argument" holding the complete argument in markdown."#;

pub struct ArgumentFlow;

impl Flow for ArgumentFlow {
    const NAME: &'static str = "argument_drafting";

    type Input = ArgumentInput;
    type Output = ArgumentOutput;

    fn render_prompt(input: &Self::Input) -> String {
        let mut vars = HashMap::new();
        if let Some(prompt) = &input.prompt {
            vars.insert("prompt", prompt.clone());
        }
        if let Some(document) = document_text(input.context_data_uri.as_deref()) {
            vars.insert("document", document);
        }
        render_template(TEMPLATE, &vars)
    }

    fn output_shape() -> OutputShape {
        OutputShape {
            name: "legal_argument",
            description: "A structured legal argument citing Indian authorities.",
            schema: json!({
                "type": "object",
                "properties": {
                    "argument": { "type": "string", "description": "A structured legal argument citing relevant Indian legal authorities." }
                },
                "required": ["argument"]
            }),
        }
    }

    fn prepare(input: Self::Input) -> Result<Self::Input, FlowError> {
        let input = ArgumentInput {
            prompt: blank_to_none(input.prompt),
            context_data_uri: blank_to_none(input.context_data_uri),
        };
        if input.prompt.is_none() && input.context_data_uri.is_none() {
            return Err(FlowError::MissingInput(
                "Provide either a prompt or a document to argue from.".to_string(),
            ));
        }
        check_document("context_data_uri", input.context_data_uri.as_deref())?;
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_only_rendering_has_no_document_section() {
        let input = ArgumentInput {
            prompt: Some("Defend a tenant against eviction for late rent payment".to_string()),
            context_data_uri: None,
        };
        let prompt = ArgumentFlow::render_prompt(&input);
        assert!(prompt.contains("Prompt: Defend a tenant"));
        assert!(!prompt.contains("Document Context:"));
    }

    #[test]
    fn undecodable_document_is_left_out_of_prompt() {
        let input = ArgumentInput {
            prompt: Some("Defend a tenant against eviction for late rent payment".to_string()),
            context_data_uri: Some("not a uri".to_string()),
        };
        assert!(!ArgumentFlow::render_prompt(&input).contains("Document Context:"));
    }

    #[test]
    fn prepare_requires_prompt_or_document() {
        let err = ArgumentFlow::prepare(ArgumentInput {
            prompt: Some(String::new()),
            context_data_uri: None,
        })
        .unwrap_err();
        assert!(matches!(err, FlowError::MissingInput(_)));
    }
}
