use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use oncoclass_classifiers::config::{ClassifyConfig, ModelType};
use oncoclass_cli::analysis::{load_mutations, run_entropy, run_validate_genes};
use oncoclass_cli::classify::{load_classify_config, run_classify};
use oncoclass_cli::util::{load_reference, validate_tsv_file};

fn reference_args(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("oncogenes")
            .long("oncogenes")
            .help("Oncogene list, one gene symbol per line")
            .required(required)
            .value_parser(clap::value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath),
    )
    .arg(
        Arg::new("tsgs")
            .long("tsgs")
            .help("Tumor suppressor gene list, one gene symbol per line")
            .required(required)
            .value_parser(clap::value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath),
    )
    .arg(
        Arg::new("smgs")
            .long("smgs")
            .help("Significantly mutated gene list, one gene symbol per line")
            .value_parser(clap::value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath),
    )
}

fn mutations_arg() -> Arg {
    Arg::new("mutations")
        .short('m')
        .long("mutations")
        .help("Tab-separated mutation export with Gene and AminoAcid columns")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("ONCOCLASS_LOG", "error,oncoclass=info"))
        .init();

    let matches = Command::new("oncoclass")
        .version(clap::crate_version!())
        .author("oncoclass developers")
        .about("Oncogene / tumor suppressor gene classification from somatic mutations")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            reference_args(
                Command::new("classify")
                    .about("Estimate held-out oncogene / TSG probabilities for every gene")
                    .arg(
                        Arg::new("config")
                            .help("Path to classifier JSON configuration file")
                            .required(false)
                            .value_parser(clap::value_parser!(PathBuf))
                            .value_hint(ValueHint::FilePath),
                    )
                    .arg(
                        Arg::new("input")
                            .short('i')
                            .long("input")
                            .help("Tab-separated gene feature table")
                            .required(true)
                            .value_parser(clap::builder::NonEmptyStringValueParser::new())
                            .value_hint(ValueHint::FilePath),
                    )
                    .arg(
                        Arg::new("output_file")
                            .short('o')
                            .long("output")
                            .help("Path to write the prediction table (TSV)")
                            .default_value("oncoclass_predictions.tsv")
                            .value_parser(clap::value_parser!(PathBuf))
                            .value_hint(ValueHint::FilePath),
                    )
                    .arg(
                        Arg::new("model_type")
                            .long("model-type")
                            .help("Override the model type from the JSON config.")
                            .value_parser(["naive_bayes", "nb", "random_forest", "rf"])
                            .value_hint(ValueHint::Other),
                    )
                    .arg(
                        Arg::new("iterations")
                            .short('n')
                            .long("iterations")
                            .help("Override the number of iterations (total_iter).")
                            .value_parser(clap::value_parser!(usize)),
                    )
                    .arg(
                        Arg::new("min_count")
                            .long("min-count")
                            .help("Override the minimum total mutation count of a gene.")
                            .value_parser(clap::value_parser!(f64)),
                    )
                    .arg(
                        Arg::new("seed")
                            .long("seed")
                            .help("Override the random seed.")
                            .value_parser(clap::value_parser!(u64)),
                    )
                    .arg(
                        Arg::new("weight")
                            .long("weight")
                            .help("Subsample training sets per class with the configured sample rates.")
                            .action(ArgAction::SetTrue),
                    ),
                false,
            ),
        )
        .subcommand(reference_args(
            Command::new("entropy")
                .about("Positional entropy of missense and all mutations per gene")
                .arg(mutations_arg())
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output-dir")
                        .help("Directory for the entropy tables")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                ),
            true,
        ))
        .subcommand(reference_args(
            Command::new("validate-genes")
                .about("Check that every reference gene occurs in the mutation export")
                .arg(mutations_arg()),
            true,
        ))
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("classify", sub_m)) => handle_classify(sub_m),
        Some(("entropy", sub_m)) => handle_entropy(sub_m),
        Some(("validate-genes", sub_m)) => handle_validate_genes(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_classify(matches: &ArgMatches) -> Result<()> {
    let input: &String = matches.get_one("input").expect("required by clap");
    let output: &PathBuf = matches.get_one("output_file").expect("defaulted by clap");
    validate_tsv_file(input)?;
    log::info!("[oncoclass::classify] Classifying genes in {}", input);

    let mut config = if let Some(config_path) = matches.get_one::<PathBuf>("config") {
        log::info!("[oncoclass::classify] Using config: {:?}", config_path);
        load_classify_config(config_path)?
    } else {
        log::info!("[oncoclass::classify] No config provided; using defaults.");
        ClassifyConfig::default()
    };

    if let Some(model_type) = matches.get_one::<String>("model_type") {
        config.model = ModelType::from_str(model_type).map_err(anyhow::Error::msg)?;
    }
    if let Some(&iterations) = matches.get_one::<usize>("iterations") {
        config.total_iter = iterations;
    }
    if let Some(&min_count) = matches.get_one::<f64>("min_count") {
        config.min_count = min_count;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = seed;
    }
    if matches.get_flag("weight") {
        config.weight = true;
    }

    if matches.get_one::<PathBuf>("config").is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        log::debug!("[oncoclass::classify] Effective config:\n{}", default_json);
    }

    let reference = match (
        matches.get_one::<PathBuf>("oncogenes"),
        matches.get_one::<PathBuf>("tsgs"),
    ) {
        (Some(oncogenes), Some(tsgs)) => Some(load_reference(
            oncogenes,
            tsgs,
            matches.get_one::<PathBuf>("smgs").map(PathBuf::as_path),
        )?),
        (None, None) => None,
        _ => anyhow::bail!("--oncogenes and --tsgs must be given together"),
    };

    match run_classify(input, output, reference.as_ref(), &config) {
        Ok(predictions) => {
            log::info!(
                "[oncoclass::classify] Completed classification of {} genes.",
                predictions.genes.len()
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Classification failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_entropy(matches: &ArgMatches) -> Result<()> {
    let mutations: &PathBuf = matches.get_one("mutations").expect("required by clap");
    validate_tsv_file(&mutations.to_string_lossy())?;
    let output_dir: &PathBuf = matches.get_one("output_dir").expect("defaulted by clap");

    let reference = load_reference(
        matches.get_one::<PathBuf>("oncogenes").expect("required by clap"),
        matches.get_one::<PathBuf>("tsgs").expect("required by clap"),
        matches.get_one::<PathBuf>("smgs").map(PathBuf::as_path),
    )?;
    let records = load_mutations(mutations)?;

    for path in run_entropy(&records, &reference, output_dir)? {
        log::info!("[oncoclass::entropy] Wrote {}", path.display());
    }
    Ok(())
}

fn handle_validate_genes(matches: &ArgMatches) -> Result<()> {
    let mutations: &PathBuf = matches.get_one("mutations").expect("required by clap");
    validate_tsv_file(&mutations.to_string_lossy())?;
    let reference = load_reference(
        matches.get_one::<PathBuf>("oncogenes").expect("required by clap"),
        matches.get_one::<PathBuf>("tsgs").expect("required by clap"),
        matches.get_one::<PathBuf>("smgs").map(PathBuf::as_path),
    )?;
    let records = load_mutations(mutations)?;

    let (reports, complete) = run_validate_genes(&records, &reference);
    for report in &reports {
        println!("{}", report);
    }
    if !complete {
        std::process::exit(1);
    }
    Ok(())
}
