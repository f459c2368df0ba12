//! Summary metrics of held-out predictions.

/// Accuracy and per-class precision / recall over the rows that have a
/// prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationSummary {
    pub n_predicted: usize,
    pub accuracy: f64,
    /// `None` when the class was never predicted.
    pub precision: Vec<Option<f64>>,
    /// `None` when the class never occurs in the truth.
    pub recall: Vec<Option<f64>>,
    /// `confusion[truth][predicted]`
    pub confusion: Vec<Vec<usize>>,
}

impl ClassificationSummary {
    /// Summarize `(true, predicted)` code pairs.
    pub fn from_pairs<I>(pairs: I, n_classes: usize) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut confusion = vec![vec![0usize; n_classes]; n_classes];
        for (truth, predicted) in pairs {
            confusion[truth][predicted] += 1;
        }

        let n_predicted: usize = confusion.iter().flatten().sum();
        let correct: usize = (0..n_classes).map(|c| confusion[c][c]).sum();
        let accuracy = if n_predicted == 0 {
            0.0
        } else {
            correct as f64 / n_predicted as f64
        };

        let precision = (0..n_classes)
            .map(|c| {
                let predicted: usize = (0..n_classes).map(|t| confusion[t][c]).sum();
                ratio(confusion[c][c], predicted)
            })
            .collect();
        let recall = (0..n_classes)
            .map(|c| ratio(confusion[c][c], confusion[c].iter().sum()))
            .collect();

        Self {
            n_predicted,
            accuracy,
            precision,
            recall,
            confusion,
        }
    }

    pub fn log_summary(&self, class_names: &[&str]) {
        log::info!(
            "Accuracy {:.4} over {} held-out genes",
            self.accuracy,
            self.n_predicted
        );
        for (c, name) in class_names.iter().enumerate() {
            log::info!(
                "  {:<10} precision {}  recall {}",
                name,
                fmt_metric(self.precision.get(c).copied().flatten()),
                fmt_metric(self.recall.get(c).copied().flatten())
            );
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

fn fmt_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "NA".to_string(), |v| format!("{:.4}", v))
}
