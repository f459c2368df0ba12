//! Reference gene lists used to label genes and to check database coverage.
//!
//! The lists are loaded once at start-up into an immutable
//! [`ReferenceGeneSets`] and passed to whatever needs them.
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MutationError, Result};

/// Biological class of a gene, independent of any numeric encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneClass {
    Other,
    Oncogene,
    Tsg,
}

impl GeneClass {
    pub const ALL: [GeneClass; 3] = [GeneClass::Other, GeneClass::Oncogene, GeneClass::Tsg];

    /// Code used in `true class` columns: other=0, oncogene=1, tsg=2.
    pub fn code(self) -> u8 {
        match self {
            GeneClass::Other => 0,
            GeneClass::Oncogene => 1,
            GeneClass::Tsg => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<GeneClass> {
        match code {
            0 => Some(GeneClass::Other),
            1 => Some(GeneClass::Oncogene),
            2 => Some(GeneClass::Tsg),
            _ => None,
        }
    }

    pub fn is_driver(self) -> bool {
        !matches!(self, GeneClass::Other)
    }
}

impl fmt::Display for GeneClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeneClass::Other => "other",
            GeneClass::Oncogene => "oncogene",
            GeneClass::Tsg => "tsg",
        };
        f.write_str(name)
    }
}

impl FromStr for GeneClass {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "other" => Ok(GeneClass::Other),
            "1" | "oncogene" | "onco" => Ok(GeneClass::Oncogene),
            "2" | "tsg" => Ok(GeneClass::Tsg),
            other => Err(format!("Unknown gene class: {}", other)),
        }
    }
}

/// Immutable oncogene / TSG / SMG reference lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceGeneSets {
    oncogenes: BTreeSet<String>,
    tsgs: BTreeSet<String>,
    smgs: BTreeSet<String>,
}

impl ReferenceGeneSets {
    pub fn new<I, J, K, S>(oncogenes: I, tsgs: J, smgs: K) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = S>,
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            oncogenes: oncogenes.into_iter().map(Into::into).collect(),
            tsgs: tsgs.into_iter().map(Into::into).collect(),
            smgs: smgs.into_iter().map(Into::into).collect(),
        }
    }

    /// Load the three lists from plain text files. The SMG list is optional;
    /// classification only needs the oncogene and TSG lists.
    pub fn from_files<P: AsRef<Path>>(oncogenes: P, tsgs: P, smgs: Option<P>) -> Result<Self> {
        let oncogenes = read_gene_list(oncogenes)?;
        let tsgs = read_gene_list(tsgs)?;
        let smgs = match smgs {
            Some(path) => read_gene_list(path)?,
            None => BTreeSet::new(),
        };
        log::debug!(
            "Loaded reference lists: {} oncogenes, {} TSGs, {} SMGs",
            oncogenes.len(),
            tsgs.len(),
            smgs.len()
        );
        Ok(Self {
            oncogenes,
            tsgs,
            smgs,
        })
    }

    pub fn oncogenes(&self) -> &BTreeSet<String> {
        &self.oncogenes
    }

    pub fn tsgs(&self) -> &BTreeSet<String> {
        &self.tsgs
    }

    pub fn smgs(&self) -> &BTreeSet<String> {
        &self.smgs
    }

    /// Class of a gene. A gene listed as both oncogene and TSG is a TSG.
    pub fn class_of(&self, gene: &str) -> GeneClass {
        if self.tsgs.contains(gene) {
            GeneClass::Tsg
        } else if self.oncogenes.contains(gene) {
            GeneClass::Oncogene
        } else {
            GeneClass::Other
        }
    }
}

/// Read one gene symbol per line. Blank lines and `#` comments are skipped;
/// only the first whitespace-separated token of a line is used.
pub fn read_gene_list<P: AsRef<Path>>(path: P) -> Result<BTreeSet<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let genes: BTreeSet<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect();

    if genes.is_empty() {
        return Err(MutationError::InvalidGeneList {
            path: path.display().to_string(),
            reason: "no gene symbols found".to_string(),
        });
    }
    Ok(genes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn tsg_wins_when_listed_twice() {
        let sets = ReferenceGeneSets::new(["KRAS", "NOTCH1"], ["TP53", "NOTCH1"], ["KRAS"]);
        assert_eq!(sets.class_of("KRAS"), GeneClass::Oncogene);
        assert_eq!(sets.class_of("TP53"), GeneClass::Tsg);
        assert_eq!(sets.class_of("NOTCH1"), GeneClass::Tsg);
        assert_eq!(sets.class_of("TTN"), GeneClass::Other);
    }

    #[test]
    fn gene_class_codes() {
        for class in GeneClass::ALL {
            assert_eq!(GeneClass::from_code(class.code()), Some(class));
        }
        assert_eq!(GeneClass::from_code(3), None);
        assert_eq!("tsg".parse::<GeneClass>().unwrap(), GeneClass::Tsg);
        assert!("driver".parse::<GeneClass>().is_err());
    }

    #[test]
    fn read_gene_list_skips_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# vogelstein oncogenes").unwrap();
        writeln!(file, "KRAS").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "BRAF\tsome note").unwrap();
        let genes = read_gene_list(file.path()).unwrap();
        assert_eq!(genes.into_iter().collect::<Vec<_>>(), vec!["BRAF", "KRAS"]);
    }

    #[test]
    fn empty_gene_list_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(read_gene_list(file.path()).is_err());
    }
}
