use console::style;
use spinners::{Spinner, Spinners};
use std::future::Future;
use std::path::Path;
use tracing::error;

use crate::api::FlowError;
use crate::cli::{Cmd, DocumentSource};
use crate::core::context::AppCtx;
use crate::core::data_uri::DataUri;
use crate::core::utils::content_type_for;

pub mod argue;
pub mod ask;
pub mod contract;
pub mod docs;
pub mod report;
pub mod research;
pub mod search;
pub mod summarize;

/// Dispatches the parsed command to the appropriate handler.
pub async fn dispatch(command: Cmd, ctx: &AppCtx) -> Result<(), String> {
    match command {
        Cmd::Contract { text, source, out } => {
            contract::run(ctx, text, &source, out.as_deref()).await
        }
        Cmd::Argue {
            prompt,
            source,
            out,
        } => argue::run(ctx, prompt, &source, out.as_deref()).await,
        Cmd::Research {
            query,
            filters,
            chat,
            with_catalog,
        } => research::run(ctx, &query, &filters, chat, with_catalog).await,
        Cmd::Search {
            query,
            filters,
            no_rerank,
        } => search::run(ctx, &query, &filters, !no_rerank).await,
        Cmd::Summarize {
            title,
            snippet,
            url,
        } => summarize::run(ctx, title, snippet, url).await,
        Cmd::Ask {
            title,
            summary,
            question,
        } => ask::run(ctx, title, summary, question).await,
        Cmd::Docs(cmd) => docs::run(ctx, cmd).await,
    }
}

/// Awaits a flow call behind the waiting spinner.
pub(crate) async fn waiting<T>(
    call: impl Future<Output = Result<T, FlowError>>,
) -> Result<T, FlowError> {
    let mut sp = Spinner::new(Spinners::Dots9, "Waiting for LLM response...".into());
    let result = call.await;
    let done = if result.is_ok() {
        "✔ Response received."
    } else {
        "✖ No response."
    };
    sp.stop_with_message(done.into());
    result
}

/// Input problems are shown as they are. Service failures are logged and
/// replaced by `generic`.
pub(crate) fn failure(err: FlowError, generic: &str) -> String {
    match err {
        FlowError::Generation(e) => {
            error!(error = %e, "flow failed");
            generic.to_string()
        }
        other => other.to_string(),
    }
}

/// A document picked with `--file` or `--doc`, ready to hand to a flow.
pub(crate) struct SelectedDocument {
    pub name: String,
    pub data_uri: String,
}

/// Resolves `--file` or `--doc` into a `data:` URI.
pub(crate) async fn select_document(
    ctx: &AppCtx,
    source: &DocumentSource,
) -> Result<Option<SelectedDocument>, String> {
    if let Some(path) = &source.file {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let data_uri = DataUri::new(content_type_for(&name), bytes).to_string();
        return Ok(Some(SelectedDocument { name, data_uri }));
    }
    if let Some(id) = &source.doc {
        let (record, bytes) = ctx
            .library()
            .load_bytes(id)
            .await
            .map_err(|e| format!("Could not load document content: {}", e))?;
        println!("{} {}", style("Document content loaded:").green(), record.filename);
        return Ok(Some(SelectedDocument {
            name: record.filename,
            data_uri: DataUri::new(record.content_type, bytes).to_string(),
        }));
    }
    Ok(None)
}

pub(crate) fn write_output(path: &Path, content: &str) -> Result<(), String> {
    std::fs::write(path, content)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    println!(
        "{} {}",
        style("Saved").green().bold(),
        style(path.display()).yellow()
    );
    Ok(())
}
