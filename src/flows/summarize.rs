//! Narrative summary of a legal document from its title, snippet and URL.
//! The document itself is never fetched.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use validator::Validate;

use crate::api::template::render_template;
use crate::api::{Flow, FlowError, OutputShape};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SummarizeInput {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub snippet: String,
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SummarizeOutput {
    #[validate(length(min = 1))]
    pub summary: String,
}

const TEMPLATE: &str = r#"You are an expert legal analyst. Using the title and snippet of the legal document below, write a summary of its key points. Write as though you have read the full document at the given URL.

Title: {{title}}
Snippet: {{snippet}}
URL: {{url}}

The summary should be about 3-4 paragraphs long. Respond with a JSON object with a single field "summary"."#;

pub struct SummarizeFlow;

impl Flow for SummarizeFlow {
    const NAME: &'static str = "document_summary";

    type Input = SummarizeInput;
    type Output = SummarizeOutput;

    fn render_prompt(input: &Self::Input) -> String {
        let vars = HashMap::from([
            ("title", input.title.clone()),
            ("snippet", input.snippet.clone()),
            ("url", input.url.clone()),
        ]);
        render_template(TEMPLATE, &vars)
    }

    fn output_shape() -> OutputShape {
        OutputShape {
            name: "document_summary",
            description: "A multi-paragraph summary of a legal document.",
            schema: json!({
                "type": "object",
                "properties": {
                    "summary": { "type": "string", "description": "A detailed summary of the legal document." }
                },
                "required": ["summary"]
            }),
        }
    }

    fn prepare(input: Self::Input) -> Result<Self::Input, FlowError> {
        Ok(SummarizeInput {
            title: input.title.trim().to_string(),
            snippet: input.snippet.trim().to_string(),
            url: input.url.trim().to_string(),
        })
    }
}
