//! Legend decoding for the severity scale
//!
//! The report publishes the scale as flat `K`/`K_desc` sibling pairs
//! (`"id4": "1-2"`, `"id4_desc": "geringe bis mittlere Belastung"`). This
//! module folds those pairs into a value-code to description mapping.

use std::collections::{BTreeMap, HashMap};

use crate::error::PollenflugError;
use crate::Result;

/// Decode table from raw severity code to human description
pub type Legend = BTreeMap<String, String>;

/// Build the code to description mapping from the report's flat legend object.
///
/// Keys carrying `_desc` are descriptions and skipped; every remaining key
/// must have a `_desc` sibling or the legend is considered corrupt.
pub fn build_legend(raw: &HashMap<String, String>) -> Result<Legend> {
    let mut legend = Legend::new();
    for (key, code) in raw {
        if key.contains("_desc") {
            continue;
        }
        let desc = raw.get(&format!("{key}_desc")).ok_or_else(|| {
            PollenflugError::payload(format!("legend key '{key}' has no '{key}_desc' sibling"))
        })?;
        legend.insert(code.clone(), desc.clone());
    }
    Ok(legend)
}
