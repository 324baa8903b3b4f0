//! Conversational Q&A about a single document.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use validator::Validate;

use crate::api::template::render_template;
use crate::api::{Flow, FlowError, OutputShape};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatInput {
    #[validate(length(min = 1))]
    pub title: String,
    pub summary: String,
    #[validate(length(min = 1, message = "Please enter a question."))]
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChatOutput {
    #[validate(length(min = 1))]
    pub answer: String,
}

const TEMPLATE: &str = r#"You are a helpful and friendly legal assistant chatting with a user about a specific legal document.

Use the title and summary below to answer questions about the document.

If the question is not about the document, for example a greeting or a general question, answer it conversationally as a general assistant. Do not refuse.

If a question about the document cannot be answered from this context, say that the information is not in the document, then give a helpful general answer where possible.

Document Title: {{title}}
Document Summary: {{summary}}

User's Question: {{question}}

Respond with a JSON object with a single field "answer"."#;

pub struct ChatFlow;

impl Flow for ChatFlow {
    const NAME: &'static str = "document_chat";

    type Input = ChatInput;
    type Output = ChatOutput;

    fn render_prompt(input: &Self::Input) -> String {
        let vars = HashMap::from([
            ("title", input.title.clone()),
            ("summary", input.summary.clone()),
            ("question", input.question.clone()),
        ]);
        render_template(TEMPLATE, &vars)
    }

    fn output_shape() -> OutputShape {
        OutputShape {
            name: "document_chat",
            description: "An answer to a question about a legal document.",
            schema: json!({
                "type": "object",
                "properties": {
                    "answer": { "type": "string", "description": "The answer to the question." }
                },
                "required": ["answer"]
            }),
        }
    }

    fn prepare(input: Self::Input) -> Result<Self::Input, FlowError> {
        Ok(ChatInput {
            title: input.title.trim().to_string(),
            summary: input.summary.trim().to_string(),
            question: input.question.trim().to_string(),
        })
    }
}
