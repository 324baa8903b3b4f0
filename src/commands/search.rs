use console::style;

use super::{failure, waiting};
use crate::core::context::AppCtx;
use crate::flows::{FilterSet, SearchFlow, SearchInput, SearchOptions, StatuteCategory};

/// Search the catalog, optionally re-ranked by the model.
pub async fn run(
    ctx: &AppCtx,
    query: &str,
    filters: &[StatuteCategory],
    rerank: bool,
) -> Result<(), String> {
    let input = SearchInput {
        query: query.to_string(),
        filters: filters.iter().copied().collect::<FilterSet>(),
    };
    let options = SearchOptions {
        rerank: rerank && ctx.config.search.rerank,
    };

    let results = if options.rerank {
        let runner = ctx.runner()?;
        waiting(SearchFlow::run(&runner, input, options)).await
    } else {
        SearchFlow::run_local(input)
    }
    .map_err(|e| {
        failure(
            e,
            "Search failed. An unexpected error occurred while searching. Please try again.",
        )
    })?;

    if results.is_empty() {
        println!("{}", style("No matching statutes or cases").green().bold());
        return Ok(());
    }

    println!("{}", style("Search Results:").green().bold());
    for result in results {
        let tags: Vec<_> = result.tags.iter().map(|t| t.label()).collect();
        println!(
            "  {} {} - {}",
            style("•").green(),
            style(&result.docid).yellow(),
            result.title
        );
        println!("    {}", result.snippet);
        println!("    {} {}", style(&result.url).dim(), style(tags.join(", ")).dim());
    }
    Ok(())
}
