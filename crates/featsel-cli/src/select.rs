//! `featsel select`: load instances, run the floating search, report the subset.
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use featsel::config::SelectionConfig;
use featsel::feature_selection::sffs::{Criteria, SequentialFloatingForwardSelection};
use featsel::io::{read_instances_with_config, shuffle_instances, DelimitedReaderConfig};

/// What a selection run found, in a form that is easy to print or save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionReport {
    pub selected: Vec<usize>,
    pub selected_names: Vec<String>,
    pub accuracy: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub num_instances: usize,
    pub num_features: usize,
}

/// Load a selection configuration from a JSON file.
pub fn load_selection_config<P: AsRef<Path>>(path: P) -> Result<SelectionConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: SelectionConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// Read `data_path`, optionally shuffle it once, and run the floating search.
pub fn run_selection<P: AsRef<Path>>(
    data_path: P,
    reader: &DelimitedReaderConfig,
    config: &SelectionConfig,
    shuffle_seed: Option<u64>,
) -> Result<SelectionReport> {
    let mut data = read_instances_with_config(&data_path, reader)?;

    if let Some(seed) = shuffle_seed {
        log::debug!("Shuffling {} instances with seed {}", data.instances.len(), seed);
        shuffle_instances(&mut data.instances, seed);
    }

    let sffs = SequentialFloatingForwardSelection::new(&data.instances, config.knn.clone())
        .context("Invalid dataset or classifier settings")?;
    let outcome = sffs
        .run(Criteria::from(&config.stopping))
        .context("Feature selection failed")?;

    let selected: Vec<usize> = outcome.features.iter().copied().collect();
    let selected_names = selected
        .iter()
        .map(|&idx| data.feature_names.get(idx).cloned().unwrap_or_default())
        .collect();

    Ok(SelectionReport {
        selected,
        selected_names,
        accuracy: outcome.accuracy,
        iterations: outcome.iterations,
        evaluations: outcome.evaluations,
        num_instances: data.instances.len(),
        num_features: data.feature_names.len(),
    })
}

/// Write the report as pretty JSON.
pub fn write_report<P: AsRef<Path>>(report: &SelectionReport, path: P) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("Failed to create output file: {}", path.as_ref().display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("Failed to write report: {}", path.as_ref().display()))?;
    Ok(())
}

/// One-line human summary for stdout.
pub fn summarize(report: &SelectionReport) -> String {
    format!(
        "Selected {} of {} features {:?} ({}) accuracy={:.4} iterations={} evaluations={}",
        report.selected.len(),
        report.num_features,
        report.selected,
        report.selected_names.join(", "),
        report.accuracy,
        report.iterations,
        report.evaluations
    )
}
