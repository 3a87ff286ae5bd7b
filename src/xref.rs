use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::Database;

pub type SecondaryIdMap = BTreeMap<Database, String>;

static PATTERNS: LazyLock<Vec<(Database, Regex)>> = LazyLock::new(|| {
    Database::ALL
        .into_iter()
        .map(|db| {
            let pattern = match db {
                Database::Chebi => r"\bCHEBI:\d+\b",
                Database::Chembl => r"\bCHEMBL\d+\b",
                Database::Zinc => r"\bZINC\d+\b",
                Database::Bdbm => r"\bBDBM\d+\b",
            };
            (db, Regex::new(pattern).expect("static xref pattern"))
        })
        .collect()
});

/// Finds the first id of every known registry in the space-joined synonym list.
pub fn extract_ids(synonyms: &[String]) -> SecondaryIdMap {
    let text = synonyms.join(" ");
    PATTERNS
        .iter()
        .filter_map(|(db, re)| re.find(&text).map(|m| (*db, m.as_str().to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synonyms(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn ignores_partial_tokens() {
        let ids = extract_ids(&synonyms(&["XCHEMBL545", "CHEBI:abc", "ZINC", "BDBM12x"]));
        assert!(ids.is_empty());
    }

    #[test]
    fn first_match_in_joined_text_wins() {
        let ids = extract_ids(&synonyms(&["ZINC000001", "ZINC000002"]));
        assert_eq!(ids.get(&Database::Zinc).map(String::as_str), Some("ZINC000001"));
    }
}
