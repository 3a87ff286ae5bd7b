use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MolpropError;

/// One molecule line from the input file: a SMILES token and an optional free-form label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    structure: String,
    label: String,
}

impl InputRecord {
    pub fn structure(&self) -> &str {
        &self.structure
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl FromStr for InputRecord {
    type Err = MolpropError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let structure = tokens.next().ok_or(MolpropError::EmptyInputLine)?;
        let label = tokens.collect::<Vec<_>>().join(" ");
        Ok(Self {
            structure: structure.to_string(),
            label,
        })
    }
}

/// External registries whose ids show up among PubChem synonyms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Chebi,
    Chembl,
    Zinc,
    Bdbm,
}

impl Database {
    pub const ALL: [Database; 4] = [
        Database::Chebi,
        Database::Chembl,
        Database::Zinc,
        Database::Bdbm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Database::Chebi => "CHEBI",
            Database::Chembl => "CHEMBL",
            Database::Zinc => "ZINC",
            Database::Bdbm => "BDBM",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_record_with_label() {
        let record: InputRecord = "CCO   ethanol   test run\n".parse().unwrap();
        assert_eq!(record.structure(), "CCO");
        assert_eq!(record.label(), "ethanol test run");
    }

    #[test]
    fn parse_record_without_label() {
        let record: InputRecord = "c1ccccc1".parse().unwrap();
        assert_eq!(record.structure(), "c1ccccc1");
        assert_eq!(record.label(), "");
    }

    #[test]
    fn parse_blank_line() {
        let err = "  \t ".parse::<InputRecord>().unwrap_err();
        assert_matches!(err, MolpropError::EmptyInputLine);
    }

    #[test]
    fn databases_sort_in_report_order() {
        let mut dbs = vec![Database::Bdbm, Database::Chebi, Database::Zinc, Database::Chembl];
        dbs.sort();
        assert_eq!(dbs, Database::ALL.to_vec());
        assert_eq!(Database::Chembl.to_string(), "CHEMBL");
    }
}
