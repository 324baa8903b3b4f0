use console::style;
use std::path::Path;

use super::{failure, report, select_document, waiting, write_output};
use crate::api::check_input;
use crate::cli::DocumentSource;
use crate::core::context::AppCtx;
use crate::flows::{ArgumentFlow, ArgumentInput};

/// Draft a legal argument from a prompt, a document, or both.
pub async fn run(
    ctx: &AppCtx,
    prompt: Option<String>,
    source: &DocumentSource,
    out: Option<&Path>,
) -> Result<(), String> {
    let document = select_document(ctx, source).await?;
    let input = check_input::<ArgumentFlow>(ArgumentInput {
        prompt,
        context_data_uri: document.map(|d| d.data_uri),
    })
    .map_err(|e| e.to_string())?;

    let runner = ctx.runner()?;
    let output = waiting(runner.run::<ArgumentFlow>(input))
        .await
        .map_err(|e| failure(e, "Generation failed. An unexpected error occurred. Please try again."))?;

    println!("\n{}", style("Generated Argument").green().bold());
    println!("{}", output.argument.trim());

    if let Some(path) = out {
        write_output(path, &report::argument_markdown(&output))?;
    }
    Ok(())
}
