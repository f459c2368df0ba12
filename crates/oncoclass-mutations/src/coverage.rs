//! Coverage of the reference gene lists by the mutation table.
//!
//! Every gene of a reference list is expected to have at least one record
//! in the mutation table; a missing gene usually means a symbol mismatch
//! between the list and the database release.
use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::records::{distinct_genes, MutationRecord};
use crate::reference::ReferenceGeneSets;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub list_name: String,
    pub expected: usize,
    pub found: usize,
    pub missing: Vec<String>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.found == self.expected
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: found {} of {} genes",
            self.list_name.to_uppercase(),
            self.found,
            self.expected
        )?;
        if !self.missing.is_empty() {
            write!(f, " (missing: {})", self.missing.join(", "))?;
        }
        Ok(())
    }
}

pub fn gene_list_coverage(
    list_name: &str,
    genes: &BTreeSet<String>,
    observed: &BTreeSet<&str>,
) -> CoverageReport {
    let missing: Vec<String> = genes
        .iter()
        .filter(|gene| !observed.contains(gene.as_str()))
        .cloned()
        .collect();
    CoverageReport {
        list_name: list_name.to_string(),
        expected: genes.len(),
        found: genes.len() - missing.len(),
        missing,
    }
}

/// Coverage of the oncogene, TSG and (when loaded) SMG lists.
pub fn reference_coverage(
    reference: &ReferenceGeneSets,
    records: &[MutationRecord],
) -> Vec<CoverageReport> {
    let observed = distinct_genes(records);
    let mut reports = vec![
        gene_list_coverage("oncogenes", reference.oncogenes(), &observed),
        gene_list_coverage("tsg", reference.tsgs(), &observed),
    ];
    if !reference.smgs().is_empty() {
        reports.push(gene_list_coverage("smg", reference.smgs(), &observed));
    }
    for report in &reports {
        if report.is_complete() {
            log::info!("{}", report);
        } else {
            log::warn!("{}", report);
        }
    }
    reports
}
