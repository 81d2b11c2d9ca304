//! airq CLI Module
//!
//! Command-line interface for training, prediction and dataset inspection.

use clap::{Args, Parser, Subcommand};
use colored::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::aqi::{AqiStandard, Category};
use crate::artifacts::CategoryVocabulary;
use crate::config::{ArtifactPaths, DEFAULT_DATA_PATH, DEFAULT_MODEL_PATH, DEFAULT_VOCABULARY_PATH};
use crate::inference::{LocationInput, Observation, Predictor};
use crate::insights::{pollutant_chart, Insight, PredictionReport};
use crate::training::{label_distribution, MissingIndexPolicy, TrainingConfig, TrainingOrchestrator};
use crate::utils::{DataLoader, DataSaver, DatasetInfo};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn category_color(category: Category, s: &str) -> ColoredString {
    match category {
        Category::Good => s.truecolor(22, 163, 74),
        Category::Moderate => s.truecolor(202, 138, 4),
        Category::Unhealthy => s.truecolor(234, 88, 12),
        Category::VeryUnhealthy => s.truecolor(220, 38, 38),
    }
}

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "airq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Air quality category derivation, training and prediction")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Locations of the fitted pipeline and category vocabulary
#[derive(Args, Debug, Clone)]
pub struct ArtifactArgs {
    /// Fitted pipeline file
    #[arg(short, long, env = "AIRQ_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Category vocabulary file
    #[arg(long, env = "AIRQ_VOCAB_PATH", default_value = DEFAULT_VOCABULARY_PATH)]
    pub vocab: PathBuf,
}

impl ArtifactArgs {
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.model, &self.vocab)
    }
}

/// One observation given field by field
#[derive(Args, Debug, Clone)]
pub struct ObservationArgs {
    #[arg(long = "pm25", default_value_t = 35.0)]
    pub pm25: f64,
    #[arg(long, default_value_t = 30.0)]
    pub pm10: f64,
    #[arg(long, default_value_t = 40.0)]
    pub no2: f64,
    #[arg(long, default_value_t = 20.0)]
    pub so2: f64,
    #[arg(long, default_value_t = 2.0)]
    pub co: f64,
    #[arg(long, default_value_t = 60.0)]
    pub o3: f64,
    #[arg(long, default_value_t = 25.0, allow_hyphen_values = true)]
    pub temperature: f64,
    #[arg(long, default_value_t = 45.0)]
    pub humidity: f64,
    #[arg(long, default_value_t = 15.0)]
    pub wind_speed: f64,

    /// City from the vocabulary, or "Other" together with --city-text
    #[arg(long)]
    pub city: Option<String>,
    /// Free-text city used when --city is "Other"
    #[arg(long)]
    pub city_text: Option<String>,

    /// Country from the vocabulary, or "Other" together with --country-text
    #[arg(long)]
    pub country: Option<String>,
    /// Free-text country used when --country is "Other"
    #[arg(long)]
    pub country_text: Option<String>,

    /// Date; defaults to the first date in the vocabulary
    #[arg(long)]
    pub date: Option<String>,
}

impl ObservationArgs {
    /// Resolve location choices against the vocabulary; unset fields take
    /// the first known value
    pub fn to_observation(&self, vocabulary: &CategoryVocabulary) -> anyhow::Result<Observation> {
        let city = resolve_choice(vocabulary, "City", self.city.as_deref(), self.city_text.as_deref())?;
        let country = resolve_choice(vocabulary, "Country", self.country.as_deref(), self.country_text.as_deref())?;
        let date = match &self.date {
            Some(date) => date.clone(),
            None => first_value(vocabulary, "Date")?,
        };

        Ok(Observation {
            pm25: self.pm25,
            pm10: self.pm10,
            no2: self.no2,
            so2: self.so2,
            co: self.co,
            o3: self.o3,
            temperature: self.temperature,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
            city,
            country,
            date,
        })
    }
}

fn first_value(vocabulary: &CategoryVocabulary, field: &str) -> anyhow::Result<String> {
    vocabulary
        .values(field)
        .first()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("vocabulary has no values for {}; pass --{} explicitly", field, field.to_lowercase()))
}

fn resolve_choice(
    vocabulary: &CategoryVocabulary,
    field: &str,
    choice: Option<&str>,
    free_text: Option<&str>,
) -> anyhow::Result<String> {
    let location = match choice {
        Some(choice) => LocationInput::from_choice(choice, free_text),
        None => LocationInput::Known(first_value(vocabulary, field)?),
    };
    if let LocationInput::FreeText(text) = &location {
        if text.is_empty() {
            anyhow::bail!("{} is \"Other\" but no free text was given", field);
        }
    }
    Ok(location.resolve())
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive labels, fit the pipeline and write both artifacts
    Train {
        /// Training data file (CSV or TSV)
        #[arg(short, long, env = "AIRQ_DATA_PATH", default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value_t = 0.2)]
        test_size: f64,

        /// Seed for the stratified split
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Maximum tree depth
        #[arg(long, default_value_t = 10)]
        max_depth: usize,

        /// Minimum samples required to split a node
        #[arg(long, default_value_t = 5)]
        min_samples_split: usize,

        /// Abort instead of dropping rows without a defined AQI
        #[arg(long)]
        strict: bool,
    },

    /// Predict the category of one observation, or of every row in a file
    Predict {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// JSON file holding one observation
        #[arg(long, conflicts_with = "data")]
        json: Option<PathBuf>,

        /// CSV file of observations for batch prediction
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Output CSV for batch predictions
        #[arg(short, long, requires = "data")]
        output: Option<PathBuf>,

        /// Write a text report of a single prediction
        #[arg(long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        observation: ObservationArgs,
    },

    /// Show the category vocabulary
    Vocab {
        /// Category vocabulary file
        #[arg(long, env = "AIRQ_VOCAB_PATH", default_value = DEFAULT_VOCABULARY_PATH)]
        vocab: PathBuf,

        /// Only this field, with the "Other" entry appended
        #[arg(short, long)]
        field: Option<String>,
    },

    /// Show data information and the derived label distribution
    Info {
        /// Input data file
        #[arg(short, long, env = "AIRQ_DATA_PATH", default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(
    data_path: &Path,
    paths: &ArtifactPaths,
    config: TrainingConfig,
) -> anyhow::Result<()> {
    section("Train");

    step_run("Loading data");
    let start = Instant::now();
    let df = DataLoader::new().load_auto(data_path)?;
    step_done(&format!("{} rows × {} cols in {:?}", df.height(), df.width(), start.elapsed()));

    step_run("Fitting pipeline");
    let start = Instant::now();
    let outcome = TrainingOrchestrator::new(config).train(&df)?;
    step_done(&format!("{:?}", start.elapsed()));

    outcome.save(paths)?;
    step_ok(&format!("Saved {}", paths.model_path.display()));
    step_ok(&format!("Saved {}", paths.vocabulary_path.display()));

    let summary = outcome.pipeline.summary();
    println!();
    println!("  {:<16} {}", muted("Train rows"), summary.n_train.to_string().white());
    println!("  {:<16} {}", muted("Test rows"), summary.n_test.to_string().white());
    println!(
        "  {:<16} {}",
        muted("Dropped"),
        (summary.dropped_undefined + summary.dropped_incomplete).to_string().white()
    );
    println!("  {:<16} {}", muted("Tree depth"), summary.tree_depth.to_string().white());
    println!("  {:<16} {}", muted("Leaves"), summary.tree_leaves.to_string().white());
    println!("  {:<16} {}", muted("Accuracy"), format!("{:.4}", summary.report.accuracy).white().bold());
    println!("  {:<16} {}", muted("Macro F1"), format!("{:.4}", summary.report.macro_f1).white());

    section("Evaluation");
    for line in summary.report.to_string().lines() {
        println!("  {}", line);
    }
    println!();

    Ok(())
}

pub fn cmd_predict(
    paths: &ArtifactPaths,
    json: Option<&Path>,
    data: Option<&Path>,
    output: Option<&Path>,
    report: Option<&Path>,
    observation: &ObservationArgs,
) -> anyhow::Result<()> {
    let predictor = Predictor::load(paths)?;

    if let Some(data_path) = data {
        return predict_file(&predictor, data_path, output);
    }

    let observation = match json {
        Some(path) => Observation::from_json(&std::fs::read_to_string(path)?)?,
        None => observation.to_observation(predictor.vocabulary())?,
    };

    let category = predictor.predict_category(&observation)?;
    let insight = Insight::new(&observation, category);

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", category_color(category, category.as_str()).bold()));
    line_box_center(&format!("{}", dim(category.headline())));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Dominant ", &format!("{} ({})", insight.dominant_pollutant, insight.dominant_value)));
    line_box(&kv("Location ", &insight.location));
    line_box(&kv("Date     ", &observation.date));
    line_box(&kv("Weather  ", &insight.weather));
    line_box_empty();
    line_box_bottom();

    section("Pollutants");
    for line in pollutant_chart(&observation, 30).lines() {
        println!("  {}", line);
    }

    section("Insight");
    if category.is_harmful() {
        println!("  {}", insight.recommendation.yellow());
    } else {
        println!("  {}", insight.recommendation.white());
    }

    if let Some(path) = report {
        PredictionReport::new(&observation, category).write_to(path)?;
        println!();
        step_ok(&format!("Report written to {}", path.display()));
    }
    println!();

    Ok(())
}

fn predict_file(predictor: &Predictor, data_path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    section("Predict");

    step_run("Loading data");
    let df = DataLoader::new().load_auto(data_path)?;
    step_done(&format!("{} rows", df.height()));

    step_run("Predicting");
    let start = Instant::now();
    let predictions = predictor.predict_frame(&df)?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    for (category, count) in label_distribution(&predictions) {
        println!("  {:<16} {}", category_color(category, category.as_str()), count);
    }

    if let Some(path) = output {
        let labels: Vec<&str> = predictions.iter().map(|c| c.as_str()).collect();
        let mut out = df.clone();
        out.with_column(Series::new("Predicted Category".into(), labels))?;
        DataSaver::save_csv(&mut out, path)?;
        println!();
        step_ok(&format!("Saved {}", path.display()));
    }
    println!();

    Ok(())
}

pub fn cmd_vocab(vocab_path: &Path, field: Option<&str>) -> anyhow::Result<()> {
    let vocabulary = CategoryVocabulary::load(vocab_path)?;

    match field {
        Some(field) => {
            section(field);
            for option in vocabulary.options(field) {
                println!("  {}", option);
            }
        }
        None => {
            section("Vocabulary");
            for field in vocabulary.fields() {
                let values = vocabulary.values(field);
                let preview: Vec<&str> = values.iter().take(5).map(|s| s.as_str()).collect();
                let more = if values.len() > preview.len() { ", …" } else { "" };
                println!(
                    "  {:<12} {:>6}  {}",
                    muted(field),
                    values.len(),
                    dim(&format!("{}{}", preview.join(", "), more))
                );
            }
        }
    }
    println!();
    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let df = DataLoader::new().load_auto(data_path)?;
    let info = DatasetInfo::describe(&df, &AqiStandard::default());

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), info.n_rows);
    println!("  {:<12} {}", muted("Columns"), info.n_cols);
    println!("  {:<12} {:.2} MB", muted("Memory"), df.estimated_size() as f64 / 1024.0 / 1024.0);
    println!();

    println!("  {:<20} {:<12} {:>6}", muted("Column"), muted("Type"), muted("Nulls"));
    println!("  {}", dim(&"─".repeat(42)));
    for (name, dtype, nulls) in &info.columns {
        println!(
            "  {:<20} {:<12} {:>6}",
            name,
            dtype.truecolor(140, 140, 140),
            nulls
        );
    }

    match &info.label_distribution {
        Some(distribution) => {
            section("Derived Categories");
            for category in Category::ALL {
                let count = distribution.get(&category).copied().unwrap_or(0);
                println!("  {:<16} {}", category_color(category, category.as_str()), count);
            }
            println!("  {:<16} {}", muted("Undefined"), info.undefined_rows);
        }
        None => {
            let reason = info.label_error.as_deref().unwrap_or("unknown error");
            println!();
            println!("  {} {}", "Categories cannot be derived:".yellow(), reason);
        }
    }

    println!();
    Ok(())
}

/// Build the training configuration from `train` flags
pub fn training_config(
    test_size: f64,
    seed: u64,
    max_depth: usize,
    min_samples_split: usize,
    strict: bool,
) -> TrainingConfig {
    let policy = if strict {
        MissingIndexPolicy::FailBatch
    } else {
        MissingIndexPolicy::DropRow
    };
    TrainingConfig::new()
        .with_test_size(test_size)
        .with_random_state(seed)
        .with_max_depth(max_depth)
        .with_min_samples_split(min_samples_split)
        .with_missing_index_policy(policy)
}
