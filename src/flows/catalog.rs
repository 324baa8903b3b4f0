//! Fixed in-memory table of statutes and landmark cases.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::filters::{FilterSet, StatuteCategory};
use crate::api::{GenerationError, ToolDescriptor, ToolHandler};

use StatuteCategory::{Const, ContractAct, Cpc, Crpc, Ipc};

/// Most results a search returns.
pub const MAX_RESULTS: usize = 5;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub docid: String,
    pub title: String,
    pub snippet: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<StatuteCategory>,
}

struct Entry {
    docid: &'static str,
    title: &'static str,
    snippet: &'static str,
    url: &'static str,
    tags: &'static [StatuteCategory],
}

impl Entry {
    fn to_result(&self) -> SearchResult {
        SearchResult {
            docid: self.docid.to_string(),
            title: self.title.to_string(),
            snippet: self.snippet.to_string(),
            url: self.url.to_string(),
            tags: self.tags.to_vec(),
        }
    }

    fn haystack(&self) -> String {
        format!("{} {}", self.title, self.snippet).to_lowercase()
    }
}

const ENTRIES: &[Entry] = &[
    Entry {
        docid: "ipc-302",
        title: "Indian Penal Code (IPC), 1860 - Section 302",
        snippet: "Punishment for murder. Whoever commits murder shall be punished with death, or imprisonment for life, and shall also be liable to fine.",
        url: "https://indiankanoon.org/doc/1560742/",
        tags: &[Ipc],
    },
    Entry {
        docid: "ipc-304",
        title: "Indian Penal Code (IPC), 1860 - Section 304",
        snippet: "Punishment for culpable homicide not amounting to murder.",
        url: "https://indiankanoon.org/doc/1119593/",
        tags: &[Ipc],
    },
    Entry {
        docid: "ipc-307",
        title: "Indian Penal Code (IPC), 1860 - Section 307",
        snippet: "Attempt to murder. Whoever does any act with such intention or knowledge that, if he by that act caused death, he would be guilty of murder.",
        url: "https://indiankanoon.org/doc/455468/",
        tags: &[Ipc],
    },
    Entry {
        docid: "ipc-420",
        title: "Indian Penal Code (IPC), 1860 - Section 420",
        snippet: "Cheating and dishonestly inducing delivery of property.",
        url: "https://indiankanoon.org/doc/1436241/",
        tags: &[Ipc],
    },
    Entry {
        docid: "ipc-498a",
        title: "Indian Penal Code (IPC), 1860 - Section 498A",
        snippet: "Husband or relative of husband of a woman subjecting her to cruelty.",
        url: "https://indiankanoon.org/doc/538436/",
        tags: &[Ipc],
    },
    Entry {
        docid: "crpc-438",
        title: "Code of Criminal Procedure (CrPC), 1973 - Section 438",
        snippet: "Direction for grant of bail to person apprehending arrest, commonly called anticipatory bail.",
        url: "https://indiankanoon.org/doc/1783708/",
        tags: &[Crpc],
    },
    Entry {
        docid: "crpc-482",
        title: "Code of Criminal Procedure (CrPC), 1973 - Section 482",
        snippet: "Saving of inherent powers of the High Court to prevent abuse of the process of any court or to secure the ends of justice.",
        url: "https://indiankanoon.org/doc/1679850/",
        tags: &[Crpc],
    },
    Entry {
        docid: "arnesh-kumar-2014",
        title: "Arnesh Kumar v. State of Bihar (2014) 8 SCC 273",
        snippet: "Guidelines against automatic arrest in cases under Section 498A; police must satisfy the conditions of Section 41 of the CrPC.",
        url: "https://indiankanoon.org/doc/2982624/",
        tags: &[Ipc, Crpc],
    },
    Entry {
        docid: "cpc-9",
        title: "Code of Civil Procedure (CPC), 1908 - Section 9",
        snippet: "Courts to try all civil suits unless their cognizance is expressly or impliedly barred.",
        url: "https://indiankanoon.org/doc/1875656/",
        tags: &[Cpc],
    },
    Entry {
        docid: "cpc-o39",
        title: "Code of Civil Procedure (CPC), 1908 - Order XXXIX Rules 1 and 2",
        snippet: "Temporary injunctions where property in dispute is in danger of being wasted, damaged or alienated.",
        url: "https://indiankanoon.org/doc/1504736/",
        tags: &[Cpc],
    },
    Entry {
        docid: "ica-27",
        title: "Indian Contract Act, 1872 - Section 27",
        snippet: "Agreement in restraint of trade void. Every agreement by which anyone is restrained from exercising a lawful profession, trade or business is to that extent void.",
        url: "https://indiankanoon.org/doc/1251356/",
        tags: &[ContractAct],
    },
    Entry {
        docid: "ica-73",
        title: "Indian Contract Act, 1872 - Section 73",
        snippet: "Compensation for loss or damage caused by breach of contract.",
        url: "https://indiankanoon.org/doc/1895111/",
        tags: &[ContractAct],
    },
    Entry {
        docid: "const-art-21",
        title: "Constitution of India - Article 21",
        snippet: "Protection of life and personal liberty. No person shall be deprived of his life or personal liberty except according to procedure established by law.",
        url: "https://indiankanoon.org/doc/1199182/",
        tags: &[Const],
    },
    Entry {
        docid: "kesavananda-bharati-1973",
        title: "Kesavananda Bharati v. State of Kerala (1973) 4 SCC 225",
        snippet: "Parliament's power to amend the Constitution under Article 368 does not extend to altering its basic structure.",
        url: "https://indiankanoon.org/doc/257876/",
        tags: &[Const],
    },
    Entry {
        docid: "maneka-gandhi-1978",
        title: "Maneka Gandhi v. Union of India (1978) 1 SCC 248",
        snippet: "Procedure depriving a person of personal liberty under Article 21 must be fair, just and reasonable.",
        url: "https://indiankanoon.org/doc/1766147/",
        tags: &[Const],
    },
];

/// Literal filtering: every query token must occur in the title or snippet,
/// and the record's tags must pass `filters`. Table order is preserved.
pub fn lookup(query: &str, filters: &FilterSet, limit: usize) -> Vec<SearchResult> {
    let tokens = tokens(query);
    ENTRIES
        .iter()
        .filter(|e| filters.admits(e.tags))
        .filter(|e| {
            let haystack = e.haystack();
            tokens.iter().all(|t| haystack.contains(t.as_str()))
        })
        .take(limit)
        .map(Entry::to_result)
        .collect()
}

fn tokens(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Debug, Deserialize)]
struct LookupArgs {
    query: String,
    #[serde(default)]
    filters: FilterSet,
}

/// Exposes [`lookup`] to the model as a tool.
pub struct CatalogLookup;

impl CatalogLookup {
    pub const NAME: &'static str = "lookup_statutes";
}

impl ToolHandler for CatalogLookup {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: Self::NAME.to_string(),
            description: "Look up Indian statutes and landmark cases in the NyayaGPT catalog by keywords and statute category.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Keywords that must all appear in the record." },
                    "filters": {
                        "type": "object",
                        "properties": {
                            "ipc": { "type": "boolean" },
                            "crpc": { "type": "boolean" },
                            "cpc": { "type": "boolean" },
                            "contract-act": { "type": "boolean" },
                            "const": { "type": "boolean" }
                        }
                    }
                },
                "required": ["query"]
            }),
        }
    }

    fn call(&self, arguments: &Value) -> Result<Value, GenerationError> {
        let args: LookupArgs = serde_json::from_value(arguments.clone()).map_err(|e| {
            GenerationError::MalformedResponse(format!("{} arguments: {}", Self::NAME, e))
        })?;
        let results = lookup(&args.query, &args.filters, MAX_RESULTS);
        Ok(json!({ "results": results }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docids_are_unique() {
        let mut ids: Vec<_> = ENTRIES.iter().map(|e| e.docid).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ENTRIES.len());
    }

    #[test]
    fn every_token_must_match() {
        let hits = lookup("punishment murder", &FilterSet::default(), MAX_RESULTS);
        let ids: Vec<_> = hits.iter().map(|h| h.docid.as_str()).collect();
        assert_eq!(ids, vec!["ipc-302", "ipc-304"]);
    }

    #[test]
    fn matching_ignores_case_and_punctuation() {
        let hits = lookup("ARTICLE 21,", &FilterSet::default(), MAX_RESULTS);
        assert!(hits.iter().any(|h| h.docid == "const-art-21"));
    }

    #[test]
    fn tag_filter_excludes_other_categories() {
        let filters = FilterSet::default().with(StatuteCategory::ContractAct);
        let hits = lookup("section", &filters, MAX_RESULTS);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.tags.contains(&StatuteCategory::ContractAct)));
    }

    #[test]
    fn limit_caps_results() {
        assert_eq!(lookup("", &FilterSet::default(), 3).len(), 3);
    }

    #[test]
    fn tool_returns_matching_records() {
        let out = CatalogLookup
            .call(&json!({ "query": "anticipatory bail" }))
            .unwrap();
        assert_eq!(out["results"][0]["docid"], "crpc-438");
    }

    #[test]
    fn tool_rejects_bad_arguments() {
        assert!(CatalogLookup.call(&json!({ "q": 1 })).is_err());
    }
}
