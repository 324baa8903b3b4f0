use console::style;

use super::{failure, waiting};
use crate::api::check_input;
use crate::core::context::AppCtx;
use crate::flows::{SummarizeFlow, SummarizeInput};

pub async fn run(ctx: &AppCtx, title: String, snippet: String, url: String) -> Result<(), String> {
    let input = check_input::<SummarizeFlow>(SummarizeInput {
        title,
        snippet,
        url,
    })
    .map_err(|e| e.to_string())?;
    let title = input.title.clone();

    let runner = ctx.runner()?;
    let output = waiting(runner.run::<SummarizeFlow>(input))
    .await
    .map_err(|e| failure(e, "Summarization failed. Please try again."))?;

    println!("\n{}", style(title).green().bold());
    println!("{}", output.summary.trim());
    Ok(())
}
