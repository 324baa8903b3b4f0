use console::style;
use dialoguer::Input;
use tracing::error;

use super::{failure, waiting};
use crate::api::{check_input, FlowRunner};
use crate::core::context::AppCtx;
use crate::flows::{
    CatalogLookup, ChatFlow, ChatInput, FilterSet, ResearchFlow, ResearchInput, ResearchOutput,
    StatuteCategory,
};

const CHAT_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Research a query or citation, then optionally chat about the result.
pub async fn run(
    ctx: &AppCtx,
    query: &str,
    filters: &[StatuteCategory],
    chat: bool,
    with_catalog: bool,
) -> Result<(), String> {
    let input = check_input::<ResearchFlow>(ResearchInput {
        query: query.to_string(),
        filters: filters.iter().copied().collect::<FilterSet>(),
    })
    .map_err(|e| e.to_string())?;

    let runner = ctx.runner()?;
    let call = async {
        if with_catalog {
            runner
                .run_with_tool::<ResearchFlow>(input, &CatalogLookup)
                .await
        } else {
            runner.run::<ResearchFlow>(input).await
        }
    };
    let result = waiting(call).await.map_err(|e| {
        failure(
            e,
            "Search failed. An unexpected error occurred while searching. Please try again.",
        )
    })?;

    print_result(&result);

    if chat {
        chat_loop(&runner, &result).await?;
    }
    Ok(())
}

fn print_result(result: &ResearchOutput) {
    println!("\n{}", style(&result.title).green().bold());
    println!("{}\n", style(&result.url).dim());
    println!("{}", style("Summary").yellow().bold());
    println!("{}\n", result.summary.trim());
    println!("{}", style("Answer").yellow().bold());
    println!("{}", result.answer.trim());
}

/// A failed answer is reported and the conversation goes on.
async fn chat_loop(runner: &FlowRunner, result: &ResearchOutput) -> Result<(), String> {
    println!(
        "\n{} Type 'exit' or 'quit' to leave.",
        style("Ask about this document.").blue()
    );
    loop {
        let question: String = Input::new()
            .with_prompt(format!("{}", style("you >").blue().bold()))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| format!("Input error: {}", e))?;

        let question = question.trim();
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }
        if question.is_empty() {
            continue;
        }

        let input = ChatInput {
            title: result.title.clone(),
            summary: result.summary.clone(),
            question: question.to_string(),
        };
        match waiting(runner.run::<ChatFlow>(input)).await {
            Ok(reply) => println!("{} {}", style("nyaya >").green().bold(), reply.answer.trim()),
            Err(e) => {
                error!(error = %e, "chat answer failed");
                println!("{} {}", style("nyaya >").red().bold(), CHAT_APOLOGY);
            }
        }
    }
    Ok(())
}
