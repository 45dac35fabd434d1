use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use featsel::config::{SelectionConfig, StoppingCriteria};
use featsel::io::DelimitedReaderConfig;
use featsel_cli::select::{load_selection_config, run_selection, summarize, write_report};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("FEATSEL_LOG", "error,featsel=info"))
        .init();

    let matches = Command::new("featsel")
        .version(clap::crate_version!())
        .about("Wrapper feature selection with a KNN classifier and floating forward search")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("select")
                .about("Select the feature subset that maximizes held-out KNN accuracy")
                .arg(
                    Arg::new("data")
                        .help("Path to a CSV (or TSV with --tsv) file with a header row")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON selection configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("label_column")
                        .short('l')
                        .long("label-column")
                        .help("Name of the column holding class labels")
                        .default_value("label")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("tsv")
                        .long("tsv")
                        .help("Input is tab-separated")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("k")
                        .short('k')
                        .long("neighbors")
                        .help("Number of neighbors that vote. Overrides the config file.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("train_ratio")
                        .long("train-ratio")
                        .help("Fraction of instances, in file order, used for training. Overrides the config file.")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("max_features")
                        .long("max-features")
                        .help("Stop once this many features are selected")
                        .value_parser(clap::value_parser!(usize))
                        .conflicts_with("patience"),
                )
                .arg(
                    Arg::new("patience")
                        .long("patience")
                        .help("Stop after this many iterations in a row without improvement")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("shuffle_seed")
                        .long("shuffle-seed")
                        .help("Shuffle the instances once with this seed before splitting")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Write the selection report as JSON to this path")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("select", sub_m)) => handle_select(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_select(matches: &ArgMatches) -> Result<()> {
    let data_path: &PathBuf = matches
        .get_one("data")
        .expect("data is a required argument");

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(config_path) => {
            log::info!("Using config: {:?}", config_path);
            load_selection_config(config_path)?
        }
        None => SelectionConfig::default(),
    };

    if let Some(&k) = matches.get_one::<usize>("k") {
        config.knn.k = k;
    }
    if let Some(&ratio) = matches.get_one::<f64>("train_ratio") {
        config.knn.train_ratio = ratio;
    }
    if let Some(&max_features) = matches.get_one::<usize>("max_features") {
        config.stopping = StoppingCriteria::MaxFeatures { max_features };
    }
    if let Some(&patience) = matches.get_one::<usize>("patience") {
        config.stopping = StoppingCriteria::NoProgress {
            max_iterations_without_progress: patience,
        };
    }

    let mut reader = if matches.get_flag("tsv") {
        DelimitedReaderConfig::tsv()
    } else {
        DelimitedReaderConfig::default()
    };
    if let Some(label) = matches.get_one::<String>("label_column") {
        reader.label_column = label.clone();
    }

    log::info!("Selecting features from {:?} with {:?}", data_path, config);

    let shuffle_seed = matches.get_one::<u64>("shuffle_seed").copied();
    let report = run_selection(data_path, &reader, &config, shuffle_seed)?;

    println!("{}", summarize(&report));

    if let Some(output_path) = matches.get_one::<PathBuf>("output_file") {
        write_report(&report, output_path)?;
        log::info!("Wrote selection report to {:?}", output_path);
    }

    Ok(())
}
