// R programs driving the random forest. Placeholders in `{{...}}` are filled
// in by `render`.

pub const FIT_RANDOM_FOREST_R: &str = r#"
suppressPackageStartupMessages(library(randomForest))

write("Loading training data", stderr());

df <- read.table(
    "{{train_file}}",
    header = TRUE,
    sep = "\t",
    row.names = 1,
    check.names = FALSE
);
df$true_class <- factor(df$true_class, levels = 0:({{n_classes}} - 1));

sampsize <- c({{sampsize}});

set.seed({{seed}});

write("Fitting random forest", stderr());

rf <- randomForest(
    true_class ~ .,
    data = df,
    replace = TRUE,
    ntree = {{ntree}},
    classwt = 1 / sampsize,
    sampsize = sampsize
);

saveRDS(rf, "{{model_file}}");
"#;

pub const PREDICT_RANDOM_FOREST_R: &str = r#"
suppressPackageStartupMessages(library(randomForest))

rf <- readRDS("{{model_file}}");

df <- read.table(
    "{{test_file}}",
    header = TRUE,
    sep = "\t",
    row.names = 1,
    check.names = FALSE
);

# Class predictions are factor level indices (1-based).
pred <- predict(rf, df, type = "response");
proba <- predict(rf, df, type = "prob");

out <- data.frame(
    key = rownames(df),
    pred_class = as.integer(pred),
    proba,
    check.names = FALSE
);

write.table(out, "{{output_file}}", sep = "\t", quote = FALSE, row.names = FALSE);
"#;

/// Substitute `{{name}}` placeholders.
pub fn render(template: &str, values: &[(&str, String)]) -> String {
    values.iter().fold(template.to_string(), |script, (name, value)| {
        script.replace(&format!("{{{{{}}}}}", name), value)
    })
}
