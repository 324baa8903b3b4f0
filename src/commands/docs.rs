use console::style;
use dialoguer::Confirm;
use std::io::Write;
use std::path::Path;

use crate::cli::DocsCmd;
use crate::core::context::AppCtx;
use crate::core::utils::format_size;

pub async fn run(ctx: &AppCtx, cmd: DocsCmd) -> Result<(), String> {
    match cmd {
        DocsCmd::Upload { path } => upload(ctx, &path).await,
        DocsCmd::List => list(ctx).await,
        DocsCmd::Delete { id } => delete(ctx, &id).await,
    }
}

async fn upload(ctx: &AppCtx, path: &Path) -> Result<(), String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| format!("'{}' is not a file", path.display()))?;

    let progress = |fraction: f32| {
        eprint!("\rUploading... {:>3.0}%", fraction * 100.0);
        let _ = std::io::stderr().flush();
    };
    let record = ctx
        .library()
        .upload(&filename, &bytes, &progress)
        .await
        .map_err(|e| format!("Upload failed: {}", e))?;
    eprintln!();

    println!(
        "{} {} ({}, {})",
        style("Uploaded").green().bold(),
        style(&record.id).yellow(),
        record.filename,
        format_size(record.file_size)
    );
    Ok(())
}

async fn list(ctx: &AppCtx) -> Result<(), String> {
    let library = ctx.library();
    let documents = library.list().await.map_err(|e| e.to_string())?;
    if documents.is_empty() {
        println!("{}", style("No uploaded documents").green().bold());
        return Ok(());
    }

    println!(
        "{} {}",
        style("Uploaded Documents for").green().bold(),
        style(library.user_id()).cyan()
    );
    for doc in documents {
        println!(
            "  {} {} - {} ({}, {})",
            style("•").green(),
            style(&doc.id).yellow(),
            doc.filename,
            format_size(doc.file_size),
            style(doc.upload_date.format("%Y-%m-%d %H:%M")).dim()
        );
    }
    Ok(())
}

async fn delete(ctx: &AppCtx, id: &str) -> Result<(), String> {
    let library = ctx.library();
    let record = library.get(id).await.map_err(|e| e.to_string())?;

    let confirmed = Confirm::new()
        .with_prompt(format!("Delete '{}'?", record.filename))
        .default(false)
        .interact()
        .map_err(|e| format!("Input error: {}", e))?;
    if !confirmed {
        println!("{}", style("Aborted").yellow());
        return Ok(());
    }

    library.delete(id).await.map_err(|e| e.to_string())?;
    println!("{} {}", style("Deleted").green().bold(), record.filename);
    Ok(())
}
