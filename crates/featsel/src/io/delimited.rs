//! CSV/TSV reader producing `Instance`s.
use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data_handling::Instance;

/// Parsed instances plus the header names of the columns used as features,
/// in feature-index order.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub instances: Vec<Instance>,
    pub feature_names: Vec<String>,
}

/// Configuration for reading delimited instance files.
#[derive(Debug, Clone)]
pub struct DelimitedReaderConfig {
    pub delimiter: u8,
    /// Column holding the class label.
    pub label_column: String,
    /// Optional list of feature columns to load (in order).
    /// When `None`, every column except the label and `ignore_columns` is a feature.
    pub feature_columns: Option<Vec<String>>,
    /// Columns to skip when auto-selecting features.
    pub ignore_columns: Vec<String>,
}

impl Default for DelimitedReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            label_column: "label".to_string(),
            feature_columns: None,
            ignore_columns: Vec::new(),
        }
    }
}

impl DelimitedReaderConfig {
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }
}

/// Read a comma-separated file with a `label` column.
pub fn read_instances<P: AsRef<Path>>(path: P) -> Result<LoadedData> {
    read_instances_with_config(path, &DelimitedReaderConfig::default())
}

/// Read a delimited file using a custom configuration.
pub fn read_instances_with_config<P: AsRef<Path>>(
    path: P,
    config: &DelimitedReaderConfig,
) -> Result<LoadedData> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(&path)
        .with_context(|| format!("Failed to open data file: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read header row")?
        .clone();

    let label_idx = find_column(&headers, &config.label_column)
        .ok_or_else(|| anyhow!("Missing label column '{}'", config.label_column))?;

    let feature_indices = resolve_feature_indices(&headers, config, label_idx)?;
    if feature_indices.is_empty() {
        return Err(anyhow!("No feature columns detected in header"));
    }

    let mut instances = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let label = record
            .get(label_idx)
            .ok_or_else(|| anyhow!("Missing label value at row {}", row_idx + 1))?;

        let mut features = Vec::with_capacity(feature_indices.len());
        for &idx in &feature_indices {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing feature value at row {}", row_idx + 1))?;
            let parsed = value.parse::<f64>().with_context(|| {
                format!(
                    "Invalid feature '{}' at row {}: '{}'",
                    headers.get(idx).unwrap_or(""),
                    row_idx + 1,
                    value
                )
            })?;
            features.push(parsed);
        }

        instances.push(Instance::new(features, label));
    }

    if instances.is_empty() {
        log::warn!("No instances found in {}", path.as_ref().display());
    }

    let feature_names = feature_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or("").to_string())
        .collect();

    log::debug!(
        "Loaded {} instances with {} features from {}",
        instances.len(),
        feature_indices.len(),
        path.as_ref().display()
    );

    Ok(LoadedData {
        instances,
        feature_names,
    })
}

/// Shuffle once with a seeded RNG. The train/test split is taken by order, so
/// this fixes which instances end up training for the whole run.
pub fn shuffle_instances(instances: &mut [Instance], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    instances.shuffle(&mut rng);
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

fn resolve_feature_indices(
    headers: &StringRecord,
    config: &DelimitedReaderConfig,
    label_idx: usize,
) -> Result<Vec<usize>> {
    if let Some(names) = &config.feature_columns {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = find_column(headers, name)
                .ok_or_else(|| anyhow!("Missing feature column '{}'", name))?;
            indices.push(idx);
        }
        return Ok(indices);
    }

    let ignore: HashSet<String> = config
        .ignore_columns
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();

    let mut indices = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        if idx == label_idx {
            continue;
        }
        if ignore.contains(&header.to_ascii_lowercase()) {
            log::debug!("Ignoring column '{}'", header);
            continue;
        }
        indices.push(idx);
    }
    Ok(indices)
}
