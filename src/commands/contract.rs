use console::style;
use std::path::Path;

use super::{failure, report, select_document, waiting, write_output};
use crate::api::check_input;
use crate::cli::DocumentSource;
use crate::core::context::AppCtx;
use crate::flows::{ContractReviewFlow, ContractReviewInput};

/// Review a contract given inline, from a file, or from the library.
pub async fn run(
    ctx: &AppCtx,
    text: Option<String>,
    source: &DocumentSource,
    out: Option<&Path>,
) -> Result<(), String> {
    let document = select_document(ctx, source).await?;
    let input = check_input::<ContractReviewFlow>(ContractReviewInput {
        contract_text: text,
        contract_data_uri: document.as_ref().map(|d| d.data_uri.clone()),
    })
    .map_err(|e| e.to_string())?;

    let runner = ctx.runner()?;
    let output = waiting(runner.run::<ContractReviewFlow>(input))
        .await
        .map_err(|e| failure(e, "Analysis failed. An unexpected error occurred. Please try again."))?;

    println!("\n{}", style("Key Clause Summary").green().bold());
    println!("{}\n", output.summary.trim());
    println!("{}", style("Risk & Revision Report").yellow().bold());
    println!("{}", output.risk_report.trim());

    if let Some(path) = out {
        let name = source.doc.as_ref().and(document.as_ref()).map(|d| d.name.as_str());
        write_output(path, &report::contract_report(&output, name))?;
    }
    Ok(())
}
