//! Which classes a classifier separates, and how they are encoded.
//!
//! Code 0 is always the background ("other") class. In the binary modes the
//! non-selected driver class is folded into the background.
use std::fmt;

use oncoclass_mutations::reference::GeneClass;
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositiveClass {
    Oncogene,
    Tsg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    Binary(PositiveClass),
    TernaryOncoTsg,
}

impl ClassificationMode {
    pub fn from_flags(classify_oncogene: bool, classify_tsg: bool) -> Result<Self> {
        match (classify_oncogene, classify_tsg) {
            (true, true) => Ok(ClassificationMode::TernaryOncoTsg),
            (true, false) => Ok(ClassificationMode::Binary(PositiveClass::Oncogene)),
            (false, true) => Ok(ClassificationMode::Binary(PositiveClass::Tsg)),
            (false, false) => Err(ClassifierError::Configuration(
                "Classification needs at least two classes: enable classify_oncogene and/or classify_tsg"
                    .to_string(),
            )),
        }
    }

    pub fn n_classes(&self) -> usize {
        match self {
            ClassificationMode::Binary(_) => 2,
            ClassificationMode::TernaryOncoTsg => 3,
        }
    }

    pub fn code_for(&self, class: GeneClass) -> usize {
        match (self, class) {
            (_, GeneClass::Other) => 0,
            (ClassificationMode::TernaryOncoTsg, GeneClass::Oncogene) => 1,
            (ClassificationMode::TernaryOncoTsg, GeneClass::Tsg) => 2,
            (ClassificationMode::Binary(PositiveClass::Oncogene), GeneClass::Oncogene) => 1,
            (ClassificationMode::Binary(PositiveClass::Oncogene), GeneClass::Tsg) => 0,
            (ClassificationMode::Binary(PositiveClass::Tsg), GeneClass::Oncogene) => 0,
            (ClassificationMode::Binary(PositiveClass::Tsg), GeneClass::Tsg) => 1,
        }
    }

    /// Label of each code, indexed by code.
    pub fn class_names(&self) -> &'static [&'static str] {
        match self {
            ClassificationMode::TernaryOncoTsg => &["other", "oncogene", "tsg"],
            ClassificationMode::Binary(PositiveClass::Oncogene) => &["other", "oncogene"],
            ClassificationMode::Binary(PositiveClass::Tsg) => &["other", "tsg"],
        }
    }

    pub fn is_valid_code(&self, code: usize) -> bool {
        code < self.n_classes()
    }
}

impl fmt::Display for ClassificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_names().join(" / "))
    }
}
