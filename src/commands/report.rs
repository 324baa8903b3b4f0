//! Plain-text and markdown renderings of flow results for `--out`.

use crate::flows::{ArgumentOutput, ContractReviewOutput};

/// The downloadable contract analysis. Named documents get the markdown form.
pub fn contract_report(output: &ContractReviewOutput, document: Option<&str>) -> String {
    match document {
        Some(name) => format!(
            "# NyayaGPT Analysis Report for {}\n\n## 1. Key Clause Summary\n{}\n\n---\n\n## 2. Risk & Revision Report\n{}\n",
            name,
            output.summary.trim(),
            output.risk_report.trim()
        ),
        None => format!(
            "NyayaGPT Analysis Report\n[Key Clause Summary]\n{}\n---\n[Risk & Revision Report]\n{}\n",
            output.summary.trim(),
            output.risk_report.trim()
        ),
    }
}

pub fn argument_markdown(output: &ArgumentOutput) -> String {
    format!("{}\n", output.argument.trim())
}
