//! The NyayaGPT flows.
//!
//! Each flow is a marker type implementing [`Flow`](crate::api::Flow);
//! prompt rendering is a pure function of the input so it can be tested
//! without a completion service. Search is the exception: it filters the
//! local catalog first and only asks the model to re-rank.

pub mod argument;
pub mod catalog;
pub mod chat;
pub mod citation;
pub mod contract;
pub mod filters;
pub mod research;
pub mod search;
pub mod summarize;

pub use argument::{ArgumentFlow, ArgumentInput, ArgumentOutput};
pub use catalog::{CatalogLookup, SearchResult, MAX_RESULTS};
pub use chat::{ChatFlow, ChatInput, ChatOutput};
pub use contract::{ContractReviewFlow, ContractReviewInput, ContractReviewOutput};
pub use filters::{FilterSet, StatuteCategory};
pub use research::{ResearchFlow, ResearchInput, ResearchOutput};
pub use search::{SearchFlow, SearchInput, SearchOptions};
pub use summarize::{SummarizeFlow, SummarizeInput, SummarizeOutput};

use crate::api::{FlowError, ValidationError};
use crate::core::data_uri::DataUri;

pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Rejects document references that cannot be embedded as text.
pub(crate) fn check_document(field: &str, uri: Option<&str>) -> Result<(), FlowError> {
    let Some(uri) = uri else {
        return Ok(());
    };
    let parsed: DataUri = uri
        .parse()
        .map_err(|e| ValidationError::new(field, format!("{}", e)))?;
    if parsed.text().is_none() {
        return Err(ValidationError::new(
            field,
            format!("unsupported media type '{}'; attach a text document", parsed.mime),
        )
        .into());
    }
    Ok(())
}

pub(crate) fn document_text(uri: Option<&str>) -> Option<String> {
    uri.and_then(|u| u.parse::<DataUri>().ok())
        .and_then(|d| d.text())
}
