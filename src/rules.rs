//! MasterFormat section rules.
//!
//! Loads the `mf_section_map.csv` rule table and gates a classified
//! filename's type against the allowed types for its section. A missing
//! table file means no section carries restrictions; a malformed table is a
//! hard error left to the caller.
//!
//! Table format (header required):
//!
//! ```csv
//! mf_section,allowed_types
//! 102000,FURN|CASEWORK|CABINET
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::patterns::NameTags;

/// Allowed type codes per MasterFormat section. Sections absent from the
/// map carry no restriction. The inner set is ordered so allowed-type
/// listings come out sorted.
pub type RuleTable = HashMap<String, BTreeSet<String>>;

#[derive(Debug, Deserialize)]
struct RuleRow {
    mf_section: String,
    allowed_types: String,
}

/// Load the rule table from a CSV file.
///
/// An absent file yields an empty table. Keys are trimmed; the
/// `allowed_types` cell is split on `|` with each token trimmed and
/// upper-cased. Duplicate section keys overwrite (last row wins).
pub fn load_rule_table(path: &Path) -> Result<RuleTable> {
    let mut table = RuleTable::new();
    if !path.exists() {
        return Ok(table);
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open rule table: {}", path.display()))?;

    for row in reader.deserialize() {
        let row: RuleRow = row
            .with_context(|| format!("Malformed row in rule table: {}", path.display()))?;
        let allowed = row
            .allowed_types
            .split('|')
            .map(|t| t.trim().to_uppercase())
            .collect();
        table.insert(row.mf_section.trim().to_string(), allowed);
    }

    Ok(table)
}

/// A failed type-vs-section check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyViolation {
    /// The rejected type slug.
    pub type_slug: String,
    /// The section whose rules rejected it.
    pub mf_sec: String,
    /// Permitted types for that section, sorted ascending.
    pub allowed: Vec<String>,
}

/// Check the tags' type against the rule table.
///
/// Sections without an entry pass unconditionally.
pub fn check_type_allowed(table: &RuleTable, tags: &NameTags) -> Result<(), PolicyViolation> {
    let Some(allowed) = table.get(tags.mf_sec()) else {
        return Ok(());
    };
    if allowed.contains(&tags.type_slug().to_uppercase()) {
        return Ok(());
    }
    Err(PolicyViolation {
        type_slug: tags.type_slug().to_string(),
        mf_sec: tags.mf_sec().to_string(),
        allowed: allowed.iter().cloned().collect(),
    })
}
