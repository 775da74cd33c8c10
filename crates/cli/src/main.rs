use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use exoscope_api::{ClassifiedTable, PredictionClient};
use exoscope_table::{ResultTable, Table, load};
use exoscope_tui::{ClassifyRequest, Startup};
use exoscope_types::{Classification, ConfusionMatrix, ManualPredictionInput};
use exoscope_util::{UserPreferences, default_log_path};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Exoplanet candidate classifier and results viewer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a CSV or JSON table in the results viewer.
    View {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    /// Sort a table and write exoplanet_predictions.csv without the viewer.
    Export {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Column to sort by: zero-based index or header label.
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending instead of ascending.
        #[arg(long, action = ArgAction::SetTrue, requires = "sort")]
        desc: bool,
        /// Directory the export is written to.
        #[arg(long, value_hint = ValueHint::DirPath)]
        out: Option<PathBuf>,
    },
    /// Classify every row of a features CSV through the prediction server.
    Predict {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long)]
        model: Option<String>,
        /// Print the summary and export instead of opening the viewer.
        #[arg(long, action = ArgAction::SetTrue)]
        no_tui: bool,
        /// Directory the export is written to.
        #[arg(long, value_hint = ValueHint::DirPath)]
        out: Option<PathBuf>,
    },
    /// Classify a single record given as feature values.
    Classify {
        #[arg(long)]
        model: Option<String>,
        /// Feature value as key=value; repeat for every required feature.
        #[arg(long = "feature", value_parser = parse_feature, action = ArgAction::Append)]
        features: Vec<(String, String)>,
    },
    /// Train a custom model on one or more labelled CSV files.
    Train {
        /// Name the trained model is saved under.
        #[arg(long)]
        name: String,
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },
    /// Print metadata for a trained model.
    Model {
        name: String,
        #[arg(long, action = ArgAction::SetTrue)]
        confusion_matrix: bool,
    },
}

impl Command {
    fn opens_viewer(&self) -> bool {
        matches!(self, Command::View { .. } | Command::Predict { no_tui: false, .. })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.opens_viewer());
    let preferences = Arc::new(load_preferences());

    match cli.command {
        Command::View { file } => {
            let table = read_table(&file)?;
            let startup = Startup {
                title: title_for(&file),
                table: Some(table),
                ..Startup::default()
            };
            exoscope_tui::run(startup, preferences).await
        }
        Command::Export { file, sort, desc, out } => {
            let table = read_table(&file)?;
            let path = export_sorted(table, sort.as_deref(), desc, export_dir(out, &preferences))?;
            println!("Exported {}", path.display());
            Ok(())
        }
        Command::Predict {
            file,
            model,
            no_tui,
            out,
        } => {
            let model = resolve_model(model, &preferences)?;
            let table = read_table(&file)?;
            if no_tui {
                predict_headless(&model, &table, export_dir(out, &preferences)).await
            } else {
                let startup = Startup {
                    title: title_for(&file),
                    table: Some(table.clone()),
                    classify: Some(ClassifyRequest { model, table }),
                    export_dir: out,
                    ..Startup::default()
                };
                exoscope_tui::run(startup, preferences).await
            }
        }
        Command::Classify { model, features } => {
            let model = resolve_model(model, &preferences)?;
            let input = ManualPredictionInput::from_pairs(
                model,
                features.iter().map(|(key, value)| (key.as_str(), value.as_str())),
            )?;
            let client = PredictionClient::new_from_env()?;
            let label = client.predict_manual(&input).await?;
            println!("{}", Classification::from_label(&label).title());
            Ok(())
        }
        Command::Train { name, files } => {
            let client = PredictionClient::new_from_env()?;
            let trained = client.train_custom_model(&name, &files).await?;
            println!("Model '{}' trained successfully.", trained.model);
            Ok(())
        }
        Command::Model { name, confusion_matrix } => {
            let client = PredictionClient::new_from_env()?;
            let model = client.model_info(&name).await?;
            println!("Model: {}", model.model_name);
            if let Some(description) = model.description.as_deref() {
                println!("{description}");
            }
            if let Some(target) = model.target.as_deref() {
                println!("Target: {target}");
            }
            println!("Features ({}): {}", model.features.len(), model.features.join(", "));
            if confusion_matrix {
                let matrix = client.confusion_matrix(&name).await?;
                println!();
                print!("{}", format_confusion_matrix(&matrix));
            }
            Ok(())
        }
    }
}

/// Logs go to stderr for one-shot commands. While the viewer owns the
/// terminal they are appended to the log file instead.
fn init_tracing(to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if to_file && let Some(file) = open_log_file(&default_log_path()) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_log_file(path: &Path) -> Option<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

fn load_preferences() -> UserPreferences {
    UserPreferences::new().unwrap_or_else(|error| {
        warn!(%error, "preferences unavailable; using in-memory defaults");
        UserPreferences::ephemeral()
    })
}

fn read_table(path: &Path) -> Result<Table> {
    load::from_path(path).with_context(|| format!("failed to load {}", path.display()))
}

fn title_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn export_dir(out: Option<PathBuf>, preferences: &UserPreferences) -> PathBuf {
    out.or_else(|| preferences.export_dir()).unwrap_or_else(|| PathBuf::from("."))
}

fn resolve_model(model: Option<String>, preferences: &UserPreferences) -> Result<String> {
    model
        .or_else(|| preferences.default_model())
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| anyhow!("no model given; pass --model or set default_model in preferences"))
}

/// `key=value` feature argument.
fn parse_feature(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing feature name in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Resolves `--sort` as a zero-based column index first, then as a header label.
fn resolve_sort_column(table: &Table, column: &str) -> Result<usize> {
    if let Ok(index) = column.trim().parse::<usize>() {
        if index < table.column_count() {
            return Ok(index);
        }
        bail!("column index {index} is out of range; the table has {} columns", table.column_count());
    }
    table
        .column_index(column)
        .ok_or_else(|| anyhow!("no column named '{}'", column.trim()))
}

fn export_sorted(table: Table, sort: Option<&str>, descending: bool, directory: PathBuf) -> Result<PathBuf> {
    let column = sort.map(|column| resolve_sort_column(&table, column)).transpose()?;
    let mut results = ResultTable::new().with_export_dir(directory);
    results.replace_table(table);
    if let Some(column) = column {
        results.sort_by_column(column);
        if descending {
            results.sort_by_column(column);
        }
    }
    results
        .export_csv()?
        .context("no results table found to export")
}

async fn predict_headless(model: &str, table: &Table, directory: PathBuf) -> Result<()> {
    let client = PredictionClient::new_from_env()?;
    let ClassifiedTable { table, summary } = client.classify_table(model, table).await?;
    println!("Confirmed:      {}", summary.confirmed);
    println!("Candidate:      {}", summary.candidate);
    println!("False Positive: {}", summary.false_positive);
    println!("Total:          {}", summary.total);
    let path = export_sorted(table, None, false, directory)?;
    info!(path = %path.display(), "predictions exported");
    println!("Exported {}", path.display());
    Ok(())
}

fn format_confusion_matrix(matrix: &ConfusionMatrix) -> String {
    let width = ConfusionMatrix::ORDER
        .iter()
        .map(|class| class.label().len())
        .max()
        .unwrap_or(0);
    let mut out = format!("{:width$}", "actual \\ predicted");
    let row_label_width = out.len();
    for predicted in ConfusionMatrix::ORDER {
        out.push_str(&format!("  {:>width$}", predicted.label()));
    }
    out.push('\n');
    for actual in ConfusionMatrix::ORDER {
        out.push_str(&format!("{:row_label_width$}", actual.label()));
        for predicted in ConfusionMatrix::ORDER {
            out.push_str(&format!("  {:>width$}", matrix.get(actual, predicted)));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn sample() -> Table {
        let mut table = Table::new(["kepoi_name", "koi_period", "prediction"]);
        table.push_row(["K2", "10.5", "Candidate"]).unwrap();
        table.push_row(["K1", "2", "Confirmed"]).unwrap();
        table
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn train_takes_a_name_and_files() {
        let cli = Cli::try_parse_from(["exoscope", "train", "--name", "kepler_rf", "a.csv", "b.csv"]).unwrap();
        let Command::Train { name, files } = cli.command else {
            panic!("expected the train command");
        };
        assert_eq!(name, "kepler_rf");
        assert_eq!(files, [PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
        assert!(Cli::try_parse_from(["exoscope", "train", "--name", "kepler_rf"]).is_err());
        assert!(!Cli::try_parse_from(["exoscope", "train", "--name", "n", "a.csv"]).unwrap().command.opens_viewer());
    }

    #[test]
    fn sort_column_accepts_index_or_label() {
        let table = sample();
        assert_eq!(resolve_sort_column(&table, "1").unwrap(), 1);
        assert_eq!(resolve_sort_column(&table, "PREDICTION").unwrap(), 2);
        assert!(resolve_sort_column(&table, "3").is_err());
        assert!(resolve_sort_column(&table, "koi_prad").is_err());
    }

    #[test]
    fn feature_arguments_split_on_first_equals() {
        assert_eq!(parse_feature("koi_period = 9.48").unwrap(), ("koi_period".into(), "9.48".into()));
        assert_eq!(parse_feature("a=b=c").unwrap(), ("a".into(), "b=c".into()));
        assert!(parse_feature("koi_period").is_err());
        assert!(parse_feature("=1").is_err());
    }

    #[test]
    fn export_sorts_descending_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_sorted(sample(), Some("koi_period"), true, dir.path().to_path_buf()).unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert_eq!(
            written,
            "kepoi_name,koi_period,prediction\nK2,10.5,Candidate\nK1,2,Confirmed"
        );
    }

    #[test]
    fn model_falls_back_to_preferences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"default_model":"random_forest"}"#).unwrap();
        let preferences = UserPreferences::load_from(&path).unwrap();
        assert_eq!(resolve_model(None, &preferences).unwrap(), "random_forest");
        assert_eq!(resolve_model(Some("svm".into()), &preferences).unwrap(), "svm");
        assert!(resolve_model(None, &UserPreferences::ephemeral()).is_err());
    }

    #[test]
    fn confusion_matrix_lines_up_by_class() {
        let matrix = ConfusionMatrix([[5, 1, 0], [2, 7, 1], [0, 3, 9]]);
        let rendered = format_confusion_matrix(&matrix);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("False Positive"));
        assert!(lines[2].starts_with("Candidate"));
        assert!(lines[2].trim_end().ends_with('1'));
    }
}
