//! Defines the command-line interface structure using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::flows::StatuteCategory;

#[derive(Parser)]
#[command(name = "nyaya", version, about = "NyayaGPT: AI legal assistant for Indian law")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Cmd,
}

/// Where a document comes from when it is not typed inline.
#[derive(Args, Debug, Default)]
pub struct DocumentSource {
    /// Read the document from a local file
    #[arg(long, conflicts_with = "doc")]
    pub file: Option<PathBuf>,
    /// Use a document from the library by ID
    #[arg(long)]
    pub doc: Option<String>,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Review a contract: key clause summary and risk report
    Contract {
        /// Contract text (at least 100 characters)
        #[arg(long)]
        text: Option<String>,
        #[command(flatten)]
        source: DocumentSource,
        /// Write the analysis report to this path
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Draft a legal argument from a situation or a document
    Argue {
        /// Situation to argue (at least 20 characters)
        #[arg(long)]
        prompt: Option<String>,
        #[command(flatten)]
        source: DocumentSource,
        /// Write the argument as markdown to this path
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Find and analyze the most relevant authority for a query or citation
    Research {
        query: String,
        /// Restrict to statute categories (ipc, crpc, cpc, contract-act, const)
        #[arg(long = "filter")]
        filters: Vec<StatuteCategory>,
        /// Open a chat about the result
        #[arg(long)]
        chat: bool,
        /// Let the model consult the local statute catalog
        #[arg(long)]
        with_catalog: bool,
    },
    /// Search the statute and case catalog
    Search {
        query: String,
        /// Restrict to statute categories (ipc, crpc, cpc, contract-act, const)
        #[arg(long = "filter")]
        filters: Vec<StatuteCategory>,
        /// Keep catalog order instead of asking the model to rank results
        #[arg(long)]
        no_rerank: bool,
    },
    /// Summarize a legal document from its title, snippet and URL
    Summarize {
        #[arg(long)]
        title: String,
        #[arg(long)]
        snippet: String,
        #[arg(long)]
        url: String,
    },
    /// Ask a question about a document
    Ask {
        #[arg(long)]
        title: String,
        #[arg(long)]
        summary: String,
        #[arg(long)]
        question: String,
    },
    /// Manage uploaded documents
    #[command(subcommand)]
    Docs(DocsCmd),
}

#[derive(Subcommand)]
pub enum DocsCmd {
    /// Upload a file to the document library
    Upload { path: PathBuf },
    /// List uploaded documents, newest first
    List,
    /// Delete an uploaded document by ID
    Delete { id: String },
}
