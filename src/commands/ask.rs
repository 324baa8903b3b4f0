use super::{failure, waiting};
use crate::api::check_input;
use crate::core::context::AppCtx;
use crate::flows::{ChatFlow, ChatInput};

/// One question about a document, outside the research chat.
pub async fn run(
    ctx: &AppCtx,
    title: String,
    summary: String,
    question: String,
) -> Result<(), String> {
    let input = check_input::<ChatFlow>(ChatInput {
        title,
        summary,
        question,
    })
    .map_err(|e| e.to_string())?;

    let runner = ctx.runner()?;
    let output = waiting(runner.run::<ChatFlow>(input))
    .await
    .map_err(|e| failure(e, "Sorry, I encountered an error. Please try again."))?;

    println!("\n{}", output.answer.trim());
    Ok(())
}
