//! Research & analysis: find the single most relevant authority for a query,
//! summarize it and answer the question.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::warn;
use validator::Validate;

use super::citation::{self, KnownCase};
use super::filters::FilterSet;
use crate::api::template::render_template;
use crate::api::{Flow, FlowError, GenerationError, OutputShape};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ResearchInput {
    #[validate(length(min = 1, message = "Please enter a query to start the search."))]
    pub query: String,
    #[serde(default)]
    pub filters: FilterSet,
}

impl ResearchInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: FilterSet::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ResearchOutput {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub summary: String,
    #[validate(length(min = 1))]
    pub answer: String,
    #[validate(url)]
    pub url: String,
}

const TEMPLATE: &str = r#"You are an expert legal researcher acting as a proxy for an Indian legal database search. Identify the legal authority the user is asking about and analyze it.

Instructions:

1. Decide whether the query is a specific case citation (for example '4 SCC 225' or 'AIR 1985 SC 945') or a general question.

2. If the query is a case citation, identify the exact case reported at that citation. Never return a different or merely related case.
   Example: the query "4 SCC 225" must be identified as "Kesavananda Bharati v. State of Kerala". No other answer is valid.
   Summarize and answer on the basis of that case only.

3. If the query is a general question, choose the single most relevant landmark document or case that answers it.

4. Give a plausible Indian Kanoon URL for the identified document.

{{#if citation}}
The query contains the case citation {{citation}}.
{{/if}}
{{#if known_case}}
The case reported at {{citation}} is {{known_case}}.
{{/if}}

User Query: {{query}}
Filters: {{filters}}

Respond with a JSON object with the fields "title", "summary", "answer" and "url"."#;

pub struct ResearchFlow;

impl ResearchFlow {
    fn known_case(input: &ResearchInput) -> Option<(citation::Citation, &'static KnownCase)> {
        let found = citation::detect(&input.query)?;
        let case = citation::known_case(&found)?;
        Some((found, case))
    }
}

impl Flow for ResearchFlow {
    const NAME: &'static str = "research_analysis";

    type Input = ResearchInput;
    type Output = ResearchOutput;

    fn render_prompt(input: &Self::Input) -> String {
        let mut vars = HashMap::new();
        vars.insert("query", input.query.clone());
        vars.insert("filters", input.filters.to_json());
        if let Some(found) = citation::detect(&input.query) {
            if let Some(case) = citation::known_case(&found) {
                vars.insert("known_case", case.title.to_string());
            }
            vars.insert("citation", found.to_string());
        }
        render_template(TEMPLATE, &vars)
    }

    fn output_shape() -> OutputShape {
        OutputShape {
            name: "legal_research",
            description: "The most relevant legal document for a query, with summary and answer.",
            schema: json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "The title of the most relevant legal document or case found." },
                    "summary": { "type": "string", "description": "A detailed summary of the legal document." },
                    "answer": { "type": "string", "description": "The specific answer to the user's question based on the document." },
                    "url": { "type": "string", "format": "uri", "description": "The URL to the full document." }
                },
                "required": ["title", "summary", "answer", "url"]
            }),
        }
    }

    fn temperature() -> Option<f32> {
        Some(0.2)
    }

    fn prepare(mut input: Self::Input) -> Result<Self::Input, FlowError> {
        input.query = input.query.trim().to_string();
        Ok(input)
    }

    /// A known citation must come back as its case, not an approximation.
    fn finish(input: &Self::Input, output: Self::Output) -> Result<Self::Output, GenerationError> {
        match Self::known_case(input) {
            Some((found, case)) if !case.matches_title(&output.title) => {
                warn!(citation = %found, expected = case.title, got = %output.title, "citation resolved to the wrong case");
                Err(GenerationError::CitationMismatch {
                    citation: found.to_string(),
                    expected: case.title.to_string(),
                    got: output.title,
                })
            }
            _ => Ok(output),
        }
    }
}
