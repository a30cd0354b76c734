//! Filesystem batch stages: classification sweep, metadata tree, population.
//!
//! Available when the `image-io` feature is enabled. A template root holds
//! `keys/` (classification templates) and `values/` (restyling templates)
//! whose file names identify templates. Every stage isolates per-item
//! failures: an unreadable image or metadata record is recorded in the
//! returned [`BatchReport`] and the stage moves on. Only a missing or
//! unreadable root directory fails the whole stage.

mod metadata;

pub use metadata::{read_metadata, write_metadata};

use crate::bank::{pair_templates, TemplateBank, TemplatePairing};
use crate::image::io::{load_image, save_image};
use crate::recolor::{recolor_with, RecolorConfig};
use crate::search::{Classification, Classifier, ClassifyConfig};
use crate::stats::extract;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{TintMatchError, TintMatchResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Subdirectory of the template root holding key templates.
pub const KEYS_DIR: &str = "keys";
/// Subdirectory of the template root holding value templates.
pub const VALUES_DIR: &str = "values";

/// An input that was skipped during a batch stage.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SkippedItem {
    /// Path of the offending input.
    pub path: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Per-stage outcome counts.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BatchReport {
    /// Number of items fully processed.
    pub processed: usize,
    /// Items skipped because of missing or unreadable inputs.
    pub skipped: Vec<SkippedItem>,
}

impl BatchReport {
    fn record(&mut self, outcome: Result<(), SkippedItem>) {
        match outcome {
            Ok(()) => self.processed += 1,
            Err(item) => {
                trace_warn!(
                    "batch_item_skipped",
                    path = item.path.as_str(),
                    reason = item.reason.as_str()
                );
                self.skipped.push(item);
            }
        }
    }
}

fn skip(path: &Path, err: TintMatchError) -> SkippedItem {
    SkippedItem {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

fn io_error(path: &Path, err: impl ToString) -> TintMatchError {
    TintMatchError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Sorted names of the regular files directly inside `dir`.
pub fn list_file_names(dir: &Path) -> TintMatchResult<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|err| io_error(dir, err))?;
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}

/// Pairs the `keys/` and `values/` listings of a template root by name.
pub fn list_template_pairs(template_root: &Path) -> TintMatchResult<TemplatePairing> {
    let keys = list_file_names(&template_root.join(KEYS_DIR))?;
    let values = list_file_names(&template_root.join(VALUES_DIR))?;
    Ok(pair_templates(&keys, &values))
}

/// Decodes every key template once into a bank, sorted by file name.
pub fn load_key_bank(template_root: &Path) -> TintMatchResult<(TemplateBank, BatchReport)> {
    let keys_dir = template_root.join(KEYS_DIR);
    let _span = trace_span!("load_key_bank").entered();
    let mut report = BatchReport::default();
    let mut templates = Vec::new();
    for name in list_file_names(&keys_dir)? {
        let path = keys_dir.join(&name);
        let outcome = load_image(&path)
            .map(|img| templates.push((name, img)))
            .map_err(|err| skip(&path, err));
        report.record(outcome);
    }
    let bank = TemplateBank::new(templates)?;
    trace_event!("key_bank_loaded", templates = bank.len());
    Ok((bank, report))
}

/// `/`-separated path of `path` relative to `root`.
fn relative_id(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Regular files under `root`, recursively, in file-name order.
fn walk_files(root: &Path) -> TintMatchResult<Vec<(String, PathBuf)>> {
    if !root.is_dir() {
        return Err(io_error(root, "not a directory"));
    }
    Ok(WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.into_path();
            relative_id(root, &path).map(|id| (id, path))
        })
        .collect())
}

fn fan_out<T, R, F>(items: &[T], parallel: bool, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    #[cfg(feature = "rayon")]
    {
        if parallel {
            return items.par_iter().map(&f).collect();
        }
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;
    items.iter().map(f).collect()
}

/// Classifies every image under `target` against the key bank.
///
/// Candidate ids are paths relative to `target`. Files that fail to decode
/// are skipped; candidates without a match above threshold are omitted.
pub fn classify_directory(
    target: &Path,
    bank: &TemplateBank,
    cfg: &ClassifyConfig,
) -> TintMatchResult<(Classification, BatchReport)> {
    let files = walk_files(target)?;
    let _span = trace_span!("classify_directory", files = files.len()).entered();
    let classifier = Classifier::new(bank).with_config(cfg.clone());

    let outcomes = fan_out(&files, cfg.parallel, |(_, path)| {
        load_image(path)
            .map(|img| classifier.best_match(&img))
            .map_err(|err| skip(path, err))
    });

    let mut classification = Classification::default();
    let mut report = BatchReport::default();
    for ((id, _), outcome) in files.iter().zip(outcomes) {
        let outcome = outcome.map(|assignment| {
            if let Some(assignment) = assignment {
                classification.insert(id.clone(), assignment);
            }
        });
        report.record(outcome);
    }
    trace_event!("classify_directory_done", assigned = classification.len());
    Ok((classification, report))
}

/// Writes one metadata record per classified image under `output_dir`.
///
/// The record for id `a/b.png` lands at `output_dir/a/b.png.json`.
pub fn build_metadata_tree(
    analysis_dir: &Path,
    output_dir: &Path,
    classification: &Classification,
    layer_count: usize,
) -> BatchReport {
    let _span = trace_span!("build_metadata_tree", records = classification.len()).entered();
    let mut report = BatchReport::default();
    for (id, assignment) in classification.iter() {
        let source = analysis_dir.join(id);
        let outcome = load_image(&source)
            .and_then(|img| extract(&assignment.template, &img, layer_count))
            .and_then(|meta| write_metadata(&output_dir.join(format!("{id}.json")), &meta))
            .map_err(|err| skip(&source, err));
        report.record(outcome);
    }
    report
}

/// Recolors value templates from every metadata record under `metadata_dir`.
///
/// The record `metadata_dir/a/b.png.json` produces `output_dir/a/b.png`.
/// Records that are unreadable, invalid, or name a missing value template are
/// skipped.
pub fn populate_images(
    template_root: &Path,
    metadata_dir: &Path,
    output_dir: &Path,
    cfg: &RecolorConfig,
    parallel: bool,
) -> TintMatchResult<BatchReport> {
    let values_dir = template_root.join(VALUES_DIR);
    let records: Vec<(String, PathBuf)> = walk_files(metadata_dir)?
        .into_iter()
        .filter(|(id, _)| id.ends_with(".json"))
        .collect();
    let _span = trace_span!("populate_images", records = records.len()).entered();

    let outcomes = fan_out(&records, parallel, |(id, path)| {
        let meta = read_metadata(path).map_err(|err| skip(path, err))?;
        let template_path = values_dir.join(&meta.template);
        let template = load_image(&template_path).map_err(|err| skip(&template_path, err))?;
        let output = recolor_with(&template, &meta, cfg).map_err(|err| skip(path, err))?;

        let out_path = output_dir.join(id.strip_suffix(".json").unwrap_or(id));
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|err| skip(parent, io_error(parent, err)))?;
        }
        save_image(&output, &out_path).map_err(|err| skip(&out_path, err))
    });

    let mut report = BatchReport::default();
    for outcome in outcomes {
        report.record(outcome);
    }
    Ok(report)
}
