//! Statute-category filters shared by search and research.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A legal-code category used to tag catalog records and narrow queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatuteCategory {
    Ipc,
    Crpc,
    Cpc,
    ContractAct,
    Const,
}

impl StatuteCategory {
    pub const ALL: [StatuteCategory; 5] = [
        StatuteCategory::Ipc,
        StatuteCategory::Crpc,
        StatuteCategory::Cpc,
        StatuteCategory::ContractAct,
        StatuteCategory::Const,
    ];

    /// The flag name used in filter sets and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            StatuteCategory::Ipc => "ipc",
            StatuteCategory::Crpc => "crpc",
            StatuteCategory::Cpc => "cpc",
            StatuteCategory::ContractAct => "contract-act",
            StatuteCategory::Const => "const",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatuteCategory::Ipc => "Indian Penal Code, 1860",
            StatuteCategory::Crpc => "Code of Criminal Procedure, 1973",
            StatuteCategory::Cpc => "Code of Civil Procedure, 1908",
            StatuteCategory::ContractAct => "Indian Contract Act, 1872",
            StatuteCategory::Const => "Constitution of India",
        }
    }
}

impl fmt::Display for StatuteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StatuteCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StatuteCategory::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown filter '{}'. Expected one of: ipc, crpc, cpc, contract-act, const",
                    s
                )
            })
    }
}

/// Optional boolean flags narrowing a query. No active flag means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crpc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpc: Option<bool>,
    #[serde(rename = "contract-act", default, skip_serializing_if = "Option::is_none")]
    pub contract_act: Option<bool>,
    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub constitution: Option<bool>,
}

impl FilterSet {
    pub fn with(mut self, category: StatuteCategory) -> Self {
        self.set(category, true);
        self
    }

    pub fn set(&mut self, category: StatuteCategory, value: bool) {
        *self.flag_mut(category) = Some(value);
    }

    pub fn is_active(&self, category: StatuteCategory) -> bool {
        let flag = match category {
            StatuteCategory::Ipc => self.ipc,
            StatuteCategory::Crpc => self.crpc,
            StatuteCategory::Cpc => self.cpc,
            StatuteCategory::ContractAct => self.contract_act,
            StatuteCategory::Const => self.constitution,
        };
        flag == Some(true)
    }

    pub fn active(&self) -> Vec<StatuteCategory> {
        StatuteCategory::ALL
            .into_iter()
            .filter(|c| self.is_active(*c))
            .collect()
    }

    pub fn is_restricted(&self) -> bool {
        StatuteCategory::ALL.into_iter().any(|c| self.is_active(c))
    }

    /// True when a record with `tags` passes the filter.
    pub fn admits(&self, tags: &[StatuteCategory]) -> bool {
        !self.is_restricted() || tags.iter().any(|t| self.is_active(*t))
    }

    /// JSON form embedded in prompts, e.g. `{"ipc":true}`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    fn flag_mut(&mut self, category: StatuteCategory) -> &mut Option<bool> {
        match category {
            StatuteCategory::Ipc => &mut self.ipc,
            StatuteCategory::Crpc => &mut self.crpc,
            StatuteCategory::Cpc => &mut self.cpc,
            StatuteCategory::ContractAct => &mut self.contract_act,
            StatuteCategory::Const => &mut self.constitution,
        }
    }
}

impl FromIterator<StatuteCategory> for FilterSet {
    fn from_iter<I: IntoIterator<Item = StatuteCategory>>(iter: I) -> Self {
        iter.into_iter().fold(FilterSet::default(), FilterSet::with)
    }
}
