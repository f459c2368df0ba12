//! Prediction result TSV writer.
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::classifier::GenePredictions;
use crate::error::Result;

const MISSING: &str = "NA";

/// Column headers: gene, true_class, n_heldout, pred_class, vote_class and
/// `prob_<class>` / `prob_<class>_sd` per class of the mode.
pub fn prediction_headers(predictions: &GenePredictions) -> Vec<String> {
    let mut headers: Vec<String> = ["gene", "true_class", "n_heldout", "pred_class", "vote_class"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for name in predictions.mode.class_names() {
        headers.push(format!("prob_{}", name));
        headers.push(format!("prob_{}_sd", name));
    }
    headers
}

/// Write predictions as TSV. Class columns hold mode codes; genes without a
/// held-out prediction get `NA`.
pub fn write_predictions<P: AsRef<Path>>(path: P, predictions: &GenePredictions) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(BufWriter::new(file));

    let headers = prediction_headers(predictions);
    writer.write_record(&headers)?;

    let n_classes = predictions.mode.n_classes();
    for gene in &predictions.genes {
        let mut record = Vec::with_capacity(headers.len());
        record.push(gene.gene.clone());
        record.push(gene.true_code.to_string());
        match &gene.result {
            Some(result) => {
                record.push(result.n_heldout.to_string());
                record.push(result.pred_class.to_string());
                record.push(result.vote_class.to_string());
                for class in 0..n_classes {
                    record.push(format!("{:.6}", result.mean_proba[class]));
                    record.push(format!("{:.6}", result.sd_proba[class]));
                }
            }
            None => {
                record.push("0".to_string());
                record.extend(std::iter::repeat(MISSING.to_string()).take(2 + 2 * n_classes));
            }
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    log::info!(
        "Wrote predictions for {} genes to {}",
        predictions.genes.len(),
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::GenePrediction;
    use crate::iteration::AggregatedPrediction;
    use crate::mode::{ClassificationMode, PositiveClass};
    use oncoclass_mutations::reference::GeneClass;

    #[test]
    fn writes_results_and_missing_rows() {
        let predictions = GenePredictions {
            mode: ClassificationMode::Binary(PositiveClass::Oncogene),
            genes: vec![
                GenePrediction {
                    gene: "KRAS".to_string(),
                    true_class: GeneClass::Oncogene,
                    true_code: 1,
                    result: Some(AggregatedPrediction {
                        n_heldout: 2,
                        mean_proba: vec![0.25, 0.75],
                        sd_proba: vec![0.05, 0.05],
                        vote_class: 1,
                        pred_class: 1,
                    }),
                },
                GenePrediction {
                    gene: "TTN".to_string(),
                    true_class: GeneClass::Other,
                    true_code: 0,
                    result: None,
                },
            ],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.tsv");
        write_predictions(&path, &predictions).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "gene\ttrue_class\tn_heldout\tpred_class\tvote_class\tprob_other\tprob_other_sd\tprob_oncogene\tprob_oncogene_sd"
        );
        assert_eq!(lines[1], "KRAS\t1\t2\t1\t1\t0.250000\t0.050000\t0.750000\t0.050000");
        assert_eq!(lines[2], "TTN\t0\t0\tNA\tNA\tNA\tNA\tNA\tNA");
    }
}
