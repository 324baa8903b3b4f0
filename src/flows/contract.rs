//! Contract review: key-clause summary plus a risk and revision report.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use validator::Validate;

use super::{blank_to_none, check_document, document_text};
use crate::api::template::render_template;
use crate::api::{Flow, FlowError, OutputShape};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContractReviewInput {
    #[validate(length(min = 100, message = "Contract text must be at least 100 characters."))]
    pub contract_text: Option<String>,
    /// A textual document as a `data:` URI.
    pub contract_data_uri: Option<String>,
}

impl ContractReviewInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            contract_text: Some(text.into()),
            contract_data_uri: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContractReviewOutput {
    #[validate(length(min = 1))]
    pub summary: String,
    #[validate(length(min = 1))]
    pub risk_report: String,
}

const TEMPLATE: &str = r#"You are an expert legal analyst specializing in Indian contract law.

Analyze the contract below. Summarize its key clauses, identify potential risks and missing clauses, and write a risk report with suggested revisions. Refer to the Indian Contract Act, 1872 and other applicable Indian law where relevant.

{{#if contract_text}}
Contract Text:
{{contract_text}}
{{/if}}

{{#if document}}
Document Context:
{{document}}
{{/if}}

Respond with a JSON object with the fields "summary" (key clause summary) and "riskReport" (risks, missing clauses and suggested revisions)."#;

pub struct ContractReviewFlow;

impl Flow for ContractReviewFlow {
    const NAME: &'static str = "contract_review";

    type Input = ContractReviewInput;
    type Output = ContractReviewOutput;

    fn render_prompt(input: &Self::Input) -> String {
        let mut vars = HashMap::new();
        if let Some(text) = &input.contract_text {
            vars.insert("contract_text", text.clone());
        }
        if let Some(document) = document_text(input.contract_data_uri.as_deref()) {
            vars.insert("document", document);
        }
        render_template(TEMPLATE, &vars)
    }

    fn output_shape() -> OutputShape {
        OutputShape {
            name: "contract_review",
            description: "Key clause summary and risk report for a contract.",
            schema: json!({
                "type": "object",
                "properties": {
                    "summary": { "type": "string", "description": "A summary of the key clauses in the contract." },
                    "riskReport": { "type": "string", "description": "Potential risks and missing clauses, with suggested revisions." }
                },
                "required": ["summary", "riskReport"]
            }),
        }
    }

    fn prepare(input: Self::Input) -> Result<Self::Input, FlowError> {
        let input = ContractReviewInput {
            contract_text: blank_to_none(input.contract_text),
            contract_data_uri: blank_to_none(input.contract_data_uri),
        };
        if input.contract_text.is_none() && input.contract_data_uri.is_none() {
            return Err(FlowError::MissingInput(
                "Provide either contract text or a document to analyze.".to_string(),
            ));
        }
        check_document("contract_data_uri", input.contract_data_uri.as_deref())?;
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data_uri::DataUri;

    fn long_text() -> String {
        "The Lessee shall pay the monthly rent of INR 50,000 on or before the fifth day of each calendar month. ".repeat(2)
    }

    #[test]
    fn prompt_omits_document_section_without_document() {
        let prompt = ContractReviewFlow::render_prompt(&ContractReviewInput::from_text(long_text()));
        assert!(prompt.contains("Contract Text:\nThe Lessee shall pay"));
        assert!(!prompt.contains("Document Context:"));
    }

    #[test]
    fn prompt_embeds_document_and_omits_text_section() {
        let uri = DataUri::new("text/plain", b"Clause 1. Term of five years.".to_vec());
        let input = ContractReviewInput {
            contract_text: None,
            contract_data_uri: Some(uri.to_string()),
        };
        let prompt = ContractReviewFlow::render_prompt(&input);
        assert!(prompt.contains("Document Context:\nClause 1. Term of five years."));
        assert!(!prompt.contains("Contract Text:"));
    }

    #[test]
    fn prepare_treats_blank_text_as_missing() {
        let input = ContractReviewInput {
            contract_text: Some("   ".to_string()),
            contract_data_uri: None,
        };
        assert!(matches!(
            ContractReviewFlow::prepare(input),
            Err(FlowError::MissingInput(_))
        ));
    }

    #[test]
    fn prepare_rejects_binary_document() {
        let uri = DataUri::new("application/pdf", vec![1, 2, 3]);
        let input = ContractReviewInput {
            contract_text: None,
            contract_data_uri: Some(uri.to_string()),
        };
        match ContractReviewFlow::prepare(input) {
            Err(FlowError::Validation(e)) => assert_eq!(e.field, "contract_data_uri"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn short_text_fails_length_check() {
        let input = ContractReviewFlow::prepare(ContractReviewInput::from_text("too short")).unwrap();
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("contract_text"));
    }
}
