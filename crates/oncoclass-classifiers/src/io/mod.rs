//! IO utilities for gene feature tables and prediction results.

pub mod gene_table;
pub mod predictions;

pub use gene_table::{read_gene_table, GeneTable};
pub use predictions::write_predictions;
