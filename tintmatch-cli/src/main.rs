use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tintmatch::pipeline::{
    build_metadata_tree, classify_directory, list_template_pairs, load_key_bank, populate_images,
    BatchReport,
};
use tintmatch::layers::MAX_LAYERS;
use tintmatch::{ClassifyConfig, MetadataConfig, RecolorConfig, TemplatePairing};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "TintMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Pipeline stage to run.
    #[arg(short, long, value_enum, default_value_t = Stage::All)]
    stage: Stage,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Stage {
    /// Check that key and value templates pair up by name.
    Pairs,
    /// Classify analysis images and write the metadata tree.
    Analyze,
    /// Recolor value templates from the metadata tree.
    Populate,
    /// Run pairs, analyze and populate in order.
    All,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    template_root: String,
    analysis_dir: String,
    metadata_dir: String,
    output_dir: String,
    threshold: f32,
    layer_count: usize,
    parallel: bool,
    contrast_damping: f32,
    report_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let classify = ClassifyConfig::default();
        let recolor = RecolorConfig::default();
        Self {
            template_root: String::new(),
            analysis_dir: String::new(),
            metadata_dir: String::new(),
            output_dir: String::new(),
            threshold: classify.threshold,
            layer_count: MetadataConfig::default().layer_count,
            parallel: classify.parallel,
            contrast_damping: recolor.contrast_damping,
            report_path: None,
        }
    }
}

impl Config {
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if !(0.0..=1.0).contains(&self.contrast_damping) {
            return Err("contrast_damping must be within [0, 1]".into());
        }
        if !(1..=MAX_LAYERS).contains(&self.layer_count) {
            return Err(format!("layer_count must be within [1, {MAX_LAYERS}]").into());
        }
        if !(0.0..1.0).contains(&self.threshold) {
            return Err("threshold must be within [0, 1)".into());
        }
        Ok(())
    }

    fn require(&self, field: &'static str, value: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
        if value.is_empty() {
            return Err(format!("{field} must be set in the config").into());
        }
        Ok(PathBuf::from(value))
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRecord {
    templates: usize,
    template_load: BatchReport,
    classified: usize,
    classify: BatchReport,
    metadata: BatchReport,
}

#[derive(Debug, Default, Serialize)]
struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    pairs: Option<TemplatePairing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    analyze: Option<AnalyzeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    populate: Option<BatchReport>,
}

fn run_analyze(config: &Config) -> Result<AnalyzeRecord, Box<dyn std::error::Error>> {
    let template_root = config.require("template_root", &config.template_root)?;
    let analysis_dir = config.require("analysis_dir", &config.analysis_dir)?;
    let metadata_dir = config.require("metadata_dir", &config.metadata_dir)?;

    let (bank, template_load) = load_key_bank(&template_root)?;
    if bank.is_empty() {
        return Err("no readable key templates found".into());
    }
    let classify_cfg = ClassifyConfig {
        threshold: config.threshold,
        parallel: config.parallel,
    };
    let (classification, classify) = classify_directory(&analysis_dir, &bank, &classify_cfg)?;
    let metadata =
        build_metadata_tree(&analysis_dir, &metadata_dir, &classification, config.layer_count);
    tracing::info!(
        classified = classification.len(),
        written = metadata.processed,
        "analysis finished"
    );

    Ok(AnalyzeRecord {
        templates: bank.len(),
        template_load,
        classified: classification.len(),
        classify,
        metadata,
    })
}

fn run_populate(config: &Config) -> Result<BatchReport, Box<dyn std::error::Error>> {
    let template_root = config.require("template_root", &config.template_root)?;
    let metadata_dir = config.require("metadata_dir", &config.metadata_dir)?;
    let output_dir = config.require("output_dir", &config.output_dir)?;
    let recolor_cfg = RecolorConfig {
        contrast_damping: config.contrast_damping,
    };
    let report = populate_images(
        &template_root,
        &metadata_dir,
        &output_dir,
        &recolor_cfg,
        config.parallel,
    )?;
    tracing::info!(
        written = report.processed,
        skipped = report.skipped.len(),
        "population finished"
    );
    Ok(report)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("tintmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    config.validate()?;

    let mut output = Output::default();
    if matches!(cli.stage, Stage::Pairs | Stage::All) {
        let root = config.require("template_root", &config.template_root)?;
        output.pairs = Some(list_template_pairs(&root)?);
    }
    if matches!(cli.stage, Stage::Analyze | Stage::All) {
        output.analyze = Some(run_analyze(&config)?);
    }
    if matches!(cli.stage, Stage::Populate | Stage::All) {
        output.populate = Some(run_populate(&config)?);
    }

    let json = serde_json::to_string_pretty(&output)?;
    match config.report_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
