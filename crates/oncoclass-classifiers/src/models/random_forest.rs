//! Random forest run by R's `randomForest` package out of process.
//!
//! Each adapter owns a private session directory. Training and test rows are
//! written there as TSV with synthetic row keys (`r0`, `r1`, ...) and
//! sanitized feature names (`f0`, `f1`, ...); the R side writes predictions
//! back keyed the same way, and they are reindexed to input order here.
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tempfile::TempDir;

use crate::error::{ClassifierError, Result};
use crate::math::Array2;
use crate::models::classifier_trait::{check_training_data, not_fitted, ClassifierModel};
use crate::models::r_scripts::{render, FIT_RANDOM_FOREST_R, PREDICT_RANDOM_FOREST_R};
use crate::sampling::{class_counts, SampleRates, SampleSizes};

pub const TRAIN_FILE: &str = "train.tsv";
pub const TEST_FILE: &str = "test.tsv";
pub const MODEL_FILE: &str = "model.rds";
pub const PREDICTIONS_FILE: &str = "predictions.tsv";
const FIT_SCRIPT: &str = "fit.R";
const PREDICT_SCRIPT: &str = "predict.R";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RCall {
    Fit,
    Predict,
}

impl fmt::Display for RCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RCall::Fit => f.write_str("fit"),
            RCall::Predict => f.write_str("predict"),
        }
    }
}

/// Executes an R script inside a session directory.
pub trait RRuntime: Send + Sync + fmt::Debug {
    fn run(&self, call: RCall, script: &Path, workdir: &Path) -> Result<()>;
}

/// The `Rscript` executable.
#[derive(Debug, Clone)]
pub struct Rscript {
    executable: PathBuf,
}

impl Rscript {
    pub fn new<P: Into<PathBuf>>(executable: P) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl RRuntime for Rscript {
    fn run(&self, call: RCall, script: &Path, workdir: &Path) -> Result<()> {
        log::trace!("Running {} {}", self.executable.display(), script.display());
        let output = Command::new(&self.executable)
            .arg("--vanilla")
            .arg(script)
            .current_dir(workdir)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ClassifierError::Bridge(format!(
                    "R runtime '{}' not found",
                    self.executable.display()
                )),
                _ => ClassifierError::Bridge(format!(
                    "failed to start '{}': {}",
                    self.executable.display(),
                    e
                )),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClassifierError::Bridge(format!(
                "random forest {} failed ({}): {}",
                call,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct RForestHandle {
    n_features: usize,
    model_path: PathBuf,
}

#[derive(Debug)]
pub struct RRandomForest {
    n_classes: usize,
    ntree: u32,
    seed: u64,
    rates: SampleRates,
    runtime: Arc<dyn RRuntime>,
    session: TempDir,
    fitted: Option<RForestHandle>,
}

impl RRandomForest {
    pub fn new(
        n_classes: usize,
        ntree: u32,
        rates: SampleRates,
        seed: u64,
        runtime: Arc<dyn RRuntime>,
    ) -> Result<Self> {
        let session = tempfile::Builder::new()
            .prefix("oncoclass-rf-")
            .tempdir()?;
        log::trace!("Random forest session in {}", session.path().display());
        Ok(Self {
            n_classes,
            ntree,
            seed,
            rates,
            runtime,
            session,
            fitted: None,
        })
    }

    pub fn session_dir(&self) -> &Path {
        self.session.path()
    }

    /// Per-class `sampsize` for R: `round(count * rate)`, at least one per
    /// class. Every class must occur in the training labels.
    pub fn sample_sizes(&self, y: &[usize]) -> Result<SampleSizes> {
        let rows: Vec<usize> = (0..y.len()).collect();
        let counts = class_counts(&rows, y, self.n_classes);
        if let Some(code) = counts.iter().position(|&c| c == 0) {
            return Err(ClassifierError::Data(format!(
                "class {} has no training rows; the random forest needs every class",
                code
            )));
        }
        Ok(SampleSizes::from_counts(&counts, &self.rates).at_least_one(&counts))
    }

    fn run_script(&self, call: RCall, name: &str, script: String) -> Result<()> {
        let path = self.session.path().join(name);
        std::fs::write(&path, script)?;
        self.runtime.run(call, &path, self.session.path())
    }

    fn predict_all(&self, x: &Array2<f64>) -> Result<(Vec<usize>, Array2<f64>)> {
        let handle = self.fitted.as_ref().ok_or_else(|| not_fitted(self.name()))?;
        if x.ncols() != handle.n_features {
            return Err(ClassifierError::Data(format!(
                "model was fitted on {} features but {} were given",
                handle.n_features,
                x.ncols()
            )));
        }
        if x.nrows() == 0 {
            return Ok((Vec::new(), Array2::from_elem((0, self.n_classes), 0.0)));
        }

        let test_path = self.session.path().join(TEST_FILE);
        let output_path = self.session.path().join(PREDICTIONS_FILE);
        // stale output from an earlier call must not be read back
        if output_path.exists() {
            std::fs::remove_file(&output_path)?;
        }
        write_r_table(&test_path, x, None)?;

        let script = render(
            PREDICT_RANDOM_FOREST_R,
            &[
                ("model_file", r_path(&handle.model_path)),
                ("test_file", r_path(&test_path)),
                ("output_file", r_path(&output_path)),
            ],
        );
        self.run_script(RCall::Predict, PREDICT_SCRIPT, script)?;

        read_r_predictions(&output_path, x.nrows(), self.n_classes)
    }
}

impl ClassifierModel for RRandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        self.fitted = None;
        check_training_data(x, y, self.n_classes)?;
        let sampsize = self.sample_sizes(y)?;

        let train_path = self.session.path().join(TRAIN_FILE);
        let model_path = self.session.path().join(MODEL_FILE);
        if model_path.exists() {
            std::fs::remove_file(&model_path)?;
        }
        write_r_table(&train_path, x, Some(y))?;

        let sampsize_r = sampsize
            .as_slice()
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        log::debug!(
            "Fitting random forest on {} rows, ntree {}, sampsize [{}]",
            y.len(),
            self.ntree,
            sampsize_r
        );

        let script = render(
            FIT_RANDOM_FOREST_R,
            &[
                ("train_file", r_path(&train_path)),
                ("model_file", r_path(&model_path)),
                ("n_classes", self.n_classes.to_string()),
                ("sampsize", sampsize_r),
                ("ntree", self.ntree.to_string()),
                ("seed", (self.seed % i32::MAX as u64).to_string()),
            ],
        );
        self.run_script(RCall::Fit, FIT_SCRIPT, script)?;

        if !model_path.exists() {
            return Err(ClassifierError::Bridge(format!(
                "random forest fit did not produce {}",
                model_path.display()
            )));
        }
        self.fitted = Some(RForestHandle {
            n_features: x.ncols(),
            model_path,
        });
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        Ok(self.predict_all(x)?.0)
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        Ok(self.predict_all(x)?.1)
    }

    fn predict_with_proba(&self, x: &Array2<f64>) -> Result<(Vec<usize>, Array2<f64>)> {
        self.predict_all(x)
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn resamples_internally(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "r_random_forest"
    }
}

pub fn row_key(row: usize) -> String {
    format!("r{}", row)
}

fn parse_row_key(key: &str) -> Option<usize> {
    key.strip_prefix('r')?.parse().ok()
}

/// R string literal of a path; backslashes and quotes escaped.
fn r_path(path: &Path) -> String {
    path.display()
        .to_string()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}

/// Write features (and labels) as a keyed TSV for `read.table(row.names = 1)`.
fn write_r_table(path: &Path, x: &Array2<f64>, y: Option<&[usize]>) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(BufWriter::new(file));

    let mut header = vec!["key".to_string()];
    header.extend((0..x.ncols()).map(|col| format!("f{}", col)));
    if y.is_some() {
        header.push("true_class".to_string());
    }
    writer.write_record(&header)?;

    for (row, values) in x.rows().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(row_key(row));
        record.extend(values.iter().map(|v| v.to_string()));
        if let Some(y) = y {
            record.push(y[row].to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse the R output table and reindex it by row key. Predicted classes
/// come back as 1-based factor levels and are shifted to 0-based codes.
pub fn read_r_predictions(
    path: &Path,
    n_rows: usize,
    n_classes: usize,
) -> Result<(Vec<usize>, Array2<f64>)> {
    let bridge = |msg: String| ClassifierError::Bridge(msg);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .map_err(|e| bridge(format!("cannot read R predictions {}: {}", path.display(), e)))?;
    let headers = reader
        .headers()
        .map_err(|e| bridge(format!("bad R prediction header: {}", e)))?
        .clone();

    let columns: HashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h, i)).collect();
    let key_idx = *columns
        .get("key")
        .ok_or_else(|| bridge("R predictions lack a 'key' column".to_string()))?;
    let pred_idx = *columns
        .get("pred_class")
        .ok_or_else(|| bridge("R predictions lack a 'pred_class' column".to_string()))?;
    let proba_idx: Vec<usize> = (0..n_classes)
        .map(|code| {
            columns.get(code.to_string().as_str()).copied().ok_or_else(|| {
                bridge(format!("R predictions lack a probability column for class {}", code))
            })
        })
        .collect::<Result<_>>()?;

    let mut classes: Vec<Option<usize>> = vec![None; n_rows];
    let mut proba = Array2::from_elem((n_rows, n_classes), 0.0);

    for result in reader.records() {
        let record = result.map_err(|e| bridge(format!("bad R prediction row: {}", e)))?;
        let key = record.get(key_idx).unwrap_or("");
        let row = parse_row_key(key)
            .filter(|&row| row < n_rows)
            .ok_or_else(|| bridge(format!("unknown row key '{}' in R predictions", key)))?;
        if classes[row].is_some() {
            return Err(bridge(format!("duplicate row key '{}' in R predictions", key)));
        }

        let raw = record.get(pred_idx).unwrap_or("");
        let level: usize = raw
            .trim()
            .parse()
            .map_err(|_| bridge(format!("non-integer prediction '{}' for {}", raw, key)))?;
        if level < 1 || level > n_classes {
            return Err(bridge(format!(
                "prediction {} for {} is outside factor levels 1..={}",
                level, key, n_classes
            )));
        }
        classes[row] = Some(level - 1);

        for (code, &idx) in proba_idx.iter().enumerate() {
            let raw = record.get(idx).unwrap_or("");
            proba[(row, code)] = raw
                .trim()
                .parse()
                .map_err(|_| bridge(format!("non-numeric probability '{}' for {}", raw, key)))?;
        }
    }

    let classes = classes
        .into_iter()
        .enumerate()
        .map(|(row, class)| {
            class.ok_or_else(|| bridge(format!("R predictions miss row {}", row_key(row))))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((classes, proba))
}
