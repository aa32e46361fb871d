//! Bank/account classification from the statement's file name.
//!
//! The policy is an ordered table of literal substrings. Matching is
//! case-sensitive and the first matching rule wins; a file name matching no
//! rule is tagged with a sentinel label and an empty accounting code so it can
//! be found during review.

use serde::{Deserialize, Serialize};

/// Label given to files whose name matches no rule.
pub const UNCLASSIFIED_LABEL: &str = "VERIFICAR_NOME_ARQUIVO";

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRule {
    /// Literal substring looked up in the file name
    pub pattern: String,
    pub label: String,
    /// Accounting code for the ledger the bank account posts to
    pub code: String,
}

impl AccountRule {
    pub fn new(pattern: &str, label: &str, code: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            label: label.to_string(),
            code: code.to_string(),
        }
    }
}

/// Bank label and accounting code stamped on every record of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub label: String,
    pub code: String,
}

impl Classification {
    pub fn is_unclassified(&self) -> bool {
        self.label == UNCLASSIFIED_LABEL && self.code.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<AccountRule>,
    unclassified_label: String,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            rules: vec![
                AccountRule::new("422-6", "422-6", "3313"),
                AccountRule::new("558-4", "558-4", "3314"),
            ],
            unclassified_label: UNCLASSIFIED_LABEL.to_string(),
        }
    }
}

impl RuleTable {
    pub fn new(rules: Vec<AccountRule>, unclassified_label: impl Into<String>) -> Self {
        Self {
            rules,
            unclassified_label: unclassified_label.into(),
        }
    }

    pub fn rules(&self) -> &[AccountRule] {
        &self.rules
    }

    pub fn unclassified_label(&self) -> &str {
        &self.unclassified_label
    }

    pub fn classify(&self, file_name: &str) -> Classification {
        self.rules
            .iter()
            .find(|rule| !rule.pattern.is_empty() && file_name.contains(rule.pattern.as_str()))
            .map(|rule| Classification {
                label: rule.label.clone(),
                code: rule.code.clone(),
            })
            .unwrap_or_else(|| Classification {
                label: self.unclassified_label.clone(),
                code: String::new(),
            })
    }
}
