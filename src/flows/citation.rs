//! Recognition of Indian law-report citations in free-text queries.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A citation found in a query, in canonical spacing and case.
///
/// SCC volumes restart every year, so the report year travels alongside the
/// reference when the query gives one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    reference: String,
    year: Option<u16>,
}

impl Citation {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            year: None,
        }
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    /// The reference without the parenthesised year, e.g. `4 SCC 225`.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn year(&self) -> Option<u16> {
        self.year
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "({}) {}", year, self.reference),
            None => f.write_str(&self.reference),
        }
    }
}

/// A citation whose case is fixed, not left to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownCase {
    pub citation: &'static str,
    /// Report year for SCC entries; AIR and SCR carry it in `citation`.
    pub year: Option<u16>,
    pub title: &'static str,
    /// Name that any acceptable title must contain.
    pub lead_party: &'static str,
}

impl KnownCase {
    /// True when `title` names this case.
    pub fn matches_title(&self, title: &str) -> bool {
        normalize(title).contains(&normalize(self.lead_party))
    }

    /// A citation without a year still pins the case; a different year does not.
    fn reported_at(&self, citation: &Citation) -> bool {
        self.citation == citation.reference()
            && match (self.year, citation.year()) {
                (Some(expected), Some(given)) => expected == given,
                _ => true,
            }
    }
}

const KESAVANANDA: &str = "Kesavananda Bharati v. State of Kerala";
const MANEKA: &str = "Maneka Gandhi v. Union of India";

const KNOWN_CASES: &[KnownCase] = &[
    KnownCase {
        citation: "4 SCC 225",
        year: Some(1973),
        title: KESAVANANDA,
        lead_party: "Kesavananda Bharati",
    },
    KnownCase {
        citation: "AIR 1973 SC 1461",
        year: None,
        title: KESAVANANDA,
        lead_party: "Kesavananda Bharati",
    },
    KnownCase {
        citation: "1 SCC 248",
        year: Some(1978),
        title: MANEKA,
        lead_party: "Maneka Gandhi",
    },
    KnownCase {
        citation: "AIR 1978 SC 597",
        year: None,
        title: MANEKA,
        lead_party: "Maneka Gandhi",
    },
    KnownCase {
        citation: "AIR 1985 SC 945",
        year: None,
        title: "Mohd. Ahmed Khan v. Shah Bano Begum",
        lead_party: "Shah Bano",
    },
    KnownCase {
        citation: "6 SCC 241",
        year: Some(1997),
        title: "Vishaka v. State of Rajasthan",
        lead_party: "Vishaka",
    },
    KnownCase {
        citation: "8 SCC 273",
        year: Some(2014),
        title: "Arnesh Kumar v. State of Bihar",
        lead_party: "Arnesh Kumar",
    },
];

fn scc_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:\(\s*(\d{4})\s*\)\s*)?\b(\d{1,2})\s+SCC\s+(\d{1,4})\b").expect("scc pattern")
    })
}

fn air_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bAIR\s+(\d{4})\s+([a-z]{2,5})\s+(\d{1,4})\b").expect("air pattern")
    })
}

fn scr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\[\s*(\d{4})\s*\]\s*(\d{1,2})\s+SCR\s+(\d{1,4})\b").expect("scr pattern")
    })
}

/// Finds the first SCC, AIR or SCR citation in `query`.
pub fn detect(query: &str) -> Option<Citation> {
    if let Some(caps) = scc_re().captures(query) {
        let citation = Citation::new(format!("{} SCC {}", &caps[2], &caps[3]));
        return Some(
            match caps.get(1).and_then(|year| year.as_str().parse().ok()) {
                Some(year) => citation.with_year(year),
                None => citation,
            },
        );
    }
    if let Some(caps) = air_re().captures(query) {
        return Some(Citation::new(format!(
            "AIR {} {} {}",
            &caps[1],
            caps[2].to_uppercase(),
            &caps[3]
        )));
    }
    scr_re()
        .captures(query)
        .map(|caps| Citation::new(format!("[{}] {} SCR {}", &caps[1], &caps[2], &caps[3])))
}

pub fn known_case(citation: &Citation) -> Option<&'static KnownCase> {
    KNOWN_CASES.iter().find(|k| k.reported_at(citation))
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_bare_scc_citation() {
        let c = detect("4 SCC 225").unwrap();
        assert_eq!(c.reference(), "4 SCC 225");
        assert_eq!(c.year(), None);
    }

    #[test]
    fn detects_scc_with_year_and_odd_spacing() {
        let c = detect("what did (1973)  4 scc   225 hold?").unwrap();
        assert_eq!(c.reference(), "4 SCC 225");
        assert_eq!(c.year(), Some(1973));
        assert_eq!(c.to_string(), "(1973) 4 SCC 225");
    }

    #[test]
    fn matching_year_pins_the_case() {
        let case = known_case(&detect("(1973) 4 SCC 225").unwrap()).unwrap();
        assert_eq!(case.lead_party, "Kesavananda Bharati");
        let case = known_case(&detect("(2014) 8 SCC 273").unwrap()).unwrap();
        assert_eq!(case.lead_party, "Arnesh Kumar");
    }

    #[test]
    fn same_volume_and_page_in_another_year_is_unknown() {
        assert!(known_case(&detect("(2014) 4 SCC 225").unwrap()).is_none());
        assert!(known_case(&detect("(1973) 8 SCC 273").unwrap()).is_none());
    }

    #[test]
    fn detects_air_citation() {
        let c = detect("air 1985 sc 945").unwrap();
        assert_eq!(c.to_string(), "AIR 1985 SC 945");
        assert_eq!(known_case(&c).unwrap().lead_party, "Shah Bano");
    }

    #[test]
    fn detects_scr_citation() {
        assert_eq!(detect("[1973] 2 SCR 1").unwrap().to_string(), "[1973] 2 SCR 1");
    }

    #[test]
    fn general_questions_are_not_citations() {
        assert!(detect("Is anticipatory bail available for 498A?").is_none());
        assert!(detect("right to privacy under Article 21").is_none());
    }

    #[test]
    fn anchor_case_is_known() {
        let case = known_case(&detect("4 SCC 225").unwrap()).unwrap();
        assert_eq!(case.title, "Kesavananda Bharati v. State of Kerala");
    }

    #[test]
    fn title_matching_tolerates_formatting() {
        let case = known_case(&Citation::new("4 SCC 225")).unwrap();
        assert!(case.matches_title("Kesavananda Bharati Sripadagalvaru vs. State of Kerala"));
        assert!(case.matches_title("KESAVANANDA BHARATI v STATE OF KERALA"));
        assert!(!case.matches_title("Golaknath v. State of Punjab"));
    }
}
