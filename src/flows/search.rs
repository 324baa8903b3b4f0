//! Statute and case search over the local catalog, optionally re-ranked by
//! the completion service.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, warn};
use validator::Validate;

use super::catalog::{self, SearchResult, MAX_RESULTS};
use super::filters::FilterSet;
use crate::api::template::render_template;
use crate::api::{Flow, FlowError, FlowRunner, OutputShape, ValidationError};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchInput {
    #[validate(length(min = 1, message = "Please enter a query to start the search."))]
    pub query: String,
    #[serde(default)]
    pub filters: FilterSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Let the completion service reorder the catalog matches.
    pub rerank: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { rerank: true }
    }
}

pub struct SearchFlow;

impl SearchFlow {
    /// Filters the catalog, then re-ranks when there is something to order.
    pub async fn run(
        runner: &FlowRunner,
        input: SearchInput,
        options: SearchOptions,
    ) -> Result<Vec<SearchResult>, FlowError> {
        let (input, candidates) = Self::candidates(input)?;
        if !options.rerank || candidates.len() < 2 {
            return Ok(cap(candidates));
        }

        let ranking = runner
            .run::<RerankFlow>(RerankInput {
                query: input.query,
                candidates: candidates.clone(),
            })
            .await?;
        Ok(cap(apply_ranking(candidates, &ranking.docids)))
    }

    /// Catalog order only; never calls the completion service.
    pub fn run_local(input: SearchInput) -> Result<Vec<SearchResult>, FlowError> {
        let (_, candidates) = Self::candidates(input)?;
        Ok(cap(candidates))
    }

    fn candidates(input: SearchInput) -> Result<(SearchInput, Vec<SearchResult>), FlowError> {
        let query = input.query.trim().to_string();
        let input = SearchInput { query, ..input };
        input.validate().map_err(ValidationError::from)?;

        let candidates = catalog::lookup(&input.query, &input.filters, usize::MAX);
        info!(query = %input.query, candidates = candidates.len(), "catalog search");
        Ok((input, candidates))
    }
}

fn cap(mut results: Vec<SearchResult>) -> Vec<SearchResult> {
    results.truncate(MAX_RESULTS);
    results
}

/// Orders `candidates` by `docids`. Unknown and repeated ids are ignored;
/// candidates the model left out keep their catalog order at the end.
fn apply_ranking(candidates: Vec<SearchResult>, docids: &[String]) -> Vec<SearchResult> {
    let mut pool: Vec<Option<SearchResult>> = candidates.into_iter().map(Some).collect();
    let mut ranked = Vec::with_capacity(pool.len());

    for id in docids {
        match pool
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|c| &c.docid == id))
        {
            Some(slot) => ranked.extend(slot.take()),
            None => warn!(docid = %id, "re-rank returned an id outside the candidates"),
        }
    }
    ranked.extend(pool.into_iter().flatten());
    ranked
}

/// Asks the model to order catalog candidates by relevance.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RerankInput {
    #[validate(length(min = 1))]
    pub query: String,
    pub candidates: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RerankOutput {
    pub docids: Vec<String>,
}

const RERANK_TEMPLATE: &str = r#"You are an expert Indian legal researcher. Order the candidate documents below from most to least relevant to the user's query.

Query: {{query}}

Candidates:
{{candidates}}

Respond with a JSON object with a single field "docids": the candidate docid values, most relevant first."#;

pub struct RerankFlow;

impl Flow for RerankFlow {
    const NAME: &'static str = "search_rerank";

    type Input = RerankInput;
    type Output = RerankOutput;

    fn render_prompt(input: &Self::Input) -> String {
        let candidates: Vec<_> = input
            .candidates
            .iter()
            .map(|c| json!({ "docid": c.docid, "title": c.title, "snippet": c.snippet }))
            .collect();
        let vars = HashMap::from([
            ("query", input.query.clone()),
            (
                "candidates",
                serde_json::to_string_pretty(&candidates).unwrap_or_default(),
            ),
        ]);
        render_template(RERANK_TEMPLATE, &vars)
    }

    fn output_shape() -> OutputShape {
        OutputShape {
            name: "search_ranking",
            description: "Candidate document ids ordered by relevance.",
            schema: json!({
                "type": "object",
                "properties": {
                    "docids": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["docids"]
            }),
        }
    }

    fn temperature() -> Option<f32> {
        Some(0.1)
    }
}
