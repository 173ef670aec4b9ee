//! Command implementations for the csvcmp binary.

use std::fs;

use anyhow::{Context, Result, bail};
use comfy_table::{CellAlignment, Table};
use tracing::{debug, info};

use csvcmp_client::BackendClient;
use csvcmp_ingest::{read_csv_table, sample_values};
use csvcmp_map::{ConfidenceThresholds, MappingStore, guess_mappings};
use csvcmp_model::{GuessSuggestion, Issue, IssueSeverity, MappingSpec};
use csvcmp_ui::{
    FileSource, IssueFilterState, IssueTable, MappingChoice, RecommendPanel, RunMode, WizardState,
    refresh_recommendations,
};

use crate::cli::{
    ColumnsArgs, FileArgs, GuessArgs, IssuesArgs, MappingsArgs, MappingsCommand, RecommendArgs,
};
use crate::source::CliColumnSource;
use crate::tables::{align_column, apply_table_style, header_cell, severity_cell};

/// Builds a compare-mode wizard from the file flags. Local files become
/// uploads; backend paths are kept for the remote lookup.
fn wizard_from(files: &FileArgs) -> WizardState {
    let mut wizard = WizardState::with_default_steps();
    wizard.set_mode(RunMode::Compare);
    wizard.left = side_source(files.left.as_deref(), files.left_path.as_deref());
    wizard.right = side_source(files.right.as_deref(), files.right_path.as_deref());
    wizard
}

fn side_source(local: Option<&std::path::Path>, remote: Option<&str>) -> FileSource {
    match (local, remote) {
        (Some(path), _) => FileSource::Upload(path.display().to_string()),
        (None, Some(path)) => FileSource::Path(path.to_string()),
        (None, None) => FileSource::None,
    }
}

fn column_source(files: &FileArgs) -> Result<CliColumnSource> {
    let client = BackendClient::new(&files.backend)?;
    Ok(CliColumnSource::new(client))
}

pub fn run_recommend(args: &RecommendArgs) -> Result<()> {
    let store = MappingStore::new(&args.mappings_dir)
        .with_context(|| format!("open mapping store at {}", args.mappings_dir.display()))?;
    let summaries = store.summaries().context("read mapping summaries")?;
    debug!(count = summaries.len(), "loaded mapping summaries");

    let source = column_source(&args.files)?;
    let mut wizard = wizard_from(&args.files);
    wizard.set_mapping_choice(MappingChoice::Existing);
    let mut panel = RecommendPanel::new(summaries);
    refresh_recommendations(&mut panel, &mut wizard, &source);

    println!("{}", panel.status().message());
    if let Some(hint) = panel.status().hint() {
        println!("{hint}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Mapping"),
        header_cell("Fields"),
        header_cell("Score"),
        header_cell("Evidence"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for rec in panel.visible() {
        table.add_row(vec![
            rec.name.clone(),
            rec.field_count.to_string(),
            format!("{}%", rec.score),
            rec.reasons.join(", "),
        ]);
    }
    println!("{table}");
    if let Some(name) = wizard.selected_mapping() {
        println!("Auto-select: {name}");
    }
    Ok(())
}

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let source = column_source(&args.files)?;
    let wizard = wizard_from(&args.files);
    let (left, right) = csvcmp_ui::resolve_columns(&source, &wizard);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell(&format!("Left ({})", left.len())),
        header_cell(&format!("Right ({})", right.len())),
    ]);
    apply_table_style(&mut table);
    let rows = left.len().max(right.len());
    for index in 0..rows {
        table.add_row(vec![
            left.get(index).cloned().unwrap_or_default(),
            right.get(index).cloned().unwrap_or_default(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_guess(args: &GuessArgs) -> Result<()> {
    let suggestions = if args.files.left.is_some() || args.files.right.is_some() {
        local_guesses(args)?
    } else if args.files.left_path.is_some() || args.files.right_path.is_some() {
        let client = BackendClient::new(&args.files.backend)?;
        client.fetch_guesses(
            args.files.left_path.as_deref(),
            args.files.right_path.as_deref(),
        )
    } else {
        bail!("provide --left/--right files or --left-path/--right-path");
    };
    info!(count = suggestions.len(), "guessed column pairings");
    print_guesses(&suggestions);
    Ok(())
}

fn local_guesses(args: &GuessArgs) -> Result<Vec<GuessSuggestion>> {
    let (Some(left_path), Some(right_path)) = (&args.files.left, &args.files.right) else {
        bail!("local guessing needs both --left and --right");
    };
    let left = read_csv_table(left_path)
        .with_context(|| format!("read {}", left_path.display()))?;
    let right = read_csv_table(right_path)
        .with_context(|| format!("read {}", right_path.display()))?;
    let left_samples = sample_values(&left, args.sample_rows);
    let right_samples = sample_values(&right, args.sample_rows);
    Ok(guess_mappings(
        &left.headers,
        &right.headers,
        &left_samples,
        &right_samples,
    ))
}

fn print_guesses(suggestions: &[GuessSuggestion]) {
    let thresholds = ConfidenceThresholds::default();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Left column"),
        header_cell("Best match"),
        header_cell("Confidence"),
        header_cell("Evidence"),
        header_cell("Alternates"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for guess in suggestions {
        let confidence = match guess.best_right {
            Some(_) => format!(
                "{}% ({})",
                guess.confidence,
                thresholds.categorize(guess.confidence).label()
            ),
            None => String::new(),
        };
        let alternates = guess
            .alternates
            .iter()
            .map(|(name, pct)| format!("{name} {pct}%"))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            guess.left_column.clone(),
            guess.best_right.clone().unwrap_or_default(),
            confidence,
            guess.reasons.join(", "),
            alternates,
        ]);
    }
    println!("{table}");
}

pub fn run_mappings(args: &MappingsArgs) -> Result<()> {
    let store = MappingStore::new(&args.mappings_dir)
        .with_context(|| format!("open mapping store at {}", args.mappings_dir.display()))?;
    match &args.command {
        MappingsCommand::List => list_mappings(&store),
        MappingsCommand::Show { name } => show_mapping(&store, name),
        MappingsCommand::Export { name, out } => export_mapping(&store, name, out.as_deref()),
        MappingsCommand::Delete { name } => {
            if store.delete(name)? {
                println!("Deleted {name}");
                Ok(())
            } else {
                bail!("no mapping named {name:?}");
            }
        }
    }
}

fn list_mappings(store: &MappingStore) -> Result<()> {
    let summaries = store.summaries()?;
    if summaries.is_empty() {
        println!("No saved mappings");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Fields"),
        header_cell("Left key"),
        header_cell("Right key"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for summary in &summaries {
        table.add_row(vec![
            summary.name.clone(),
            summary.field_count.to_string(),
            summary.left_key().unwrap_or("--").to_string(),
            summary.right_key().unwrap_or("--").to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn show_mapping(store: &MappingStore, name: &str) -> Result<()> {
    let Some(spec) = store.load(name)? else {
        bail!("no mapping named {name:?}");
    };
    print_spec_header(&spec);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Field"),
        header_cell("Left"),
        header_cell("Right"),
        header_cell("Skip"),
        header_cell("Normalize"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for (index, field) in spec.fields.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            field.name.clone(),
            field.left.clone(),
            field.right.clone(),
            if field.skip { "yes" } else { "" }.to_string(),
            field.normalize.join(", "),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn print_spec_header(spec: &MappingSpec) {
    println!("Mapping: {}", spec.meta.name);
    if let Some(created) = &spec.meta.created_at {
        println!("Created: {created}");
    }
    if !spec.keys.left.is_empty() || !spec.keys.right.is_empty() {
        println!("Keys: {} <-> {}", spec.keys.left, spec.keys.right);
    }
}

fn export_mapping(
    store: &MappingStore,
    name: &str,
    out: Option<&std::path::Path>,
) -> Result<()> {
    let Some(document) = store.export(name)? else {
        bail!("no mapping named {name:?}");
    };
    match out {
        Some(path) => {
            fs::write(path, &document).with_context(|| format!("write {}", path.display()))?;
            info!(mapping = name, out = %path.display(), "exported mapping");
        }
        None => println!("{document}"),
    }
    Ok(())
}

pub fn run_issues(args: &IssuesArgs) -> Result<()> {
    let mut reader = csv::Reader::from_path(&args.report)
        .with_context(|| format!("open {}", args.report.display()))?;
    let mut rows = Vec::new();
    for record in reader.deserialize::<Issue>() {
        rows.push(record.with_context(|| format!("parse {}", args.report.display()))?);
    }
    let table = IssueTable::new(rows);

    if let Some(kind) = &args.kind
        && !table.kinds().contains(&kind.as_str())
    {
        bail!(
            "unknown issue type {kind:?}; report contains: {}",
            table.kinds().join(", ")
        );
    }

    let severity = args
        .severity
        .as_deref()
        .map(str::parse::<IssueSeverity>)
        .transpose()
        .map_err(anyhow::Error::new)?;
    let filter = IssueFilterState {
        search: args.search.clone().unwrap_or_default(),
        severity,
        kind: args.kind.clone(),
    };

    let visible = filter.visible(&table);
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Record"),
        header_cell("Severity"),
        header_cell("Type"),
        header_cell("Column"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut out);
    for issue in &visible {
        out.add_row(vec![
            comfy_table::Cell::new(&issue.record_key),
            severity_cell(issue.severity),
            comfy_table::Cell::new(&issue.issue_type),
            comfy_table::Cell::new(issue.column.as_deref().unwrap_or("")),
            comfy_table::Cell::new(&issue.message),
        ]);
    }
    println!("{out}");
    println!("{} of {} issues", visible.len(), table.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;
    use crate::cli::DEFAULT_BACKEND_URL;

    fn file_args(left: Option<&str>, left_path: Option<&str>) -> FileArgs {
        FileArgs {
            left: left.map(PathBuf::from),
            right: None,
            left_path: left_path.map(String::from),
            right_path: None,
            backend: DEFAULT_BACKEND_URL.to_string(),
        }
    }

    #[test]
    fn local_file_wins_over_backend_path() {
        let files = file_args(Some("left.csv"), Some("/srv/left.csv"));
        let wizard = wizard_from(&files);
        assert_eq!(wizard.left, FileSource::Upload("left.csv".to_string()));
        assert_eq!(wizard.right, FileSource::None);
        assert_eq!(wizard.mode(), RunMode::Compare);
    }

    #[test]
    fn backend_path_used_when_no_local_file() {
        let files = file_args(None, Some("/srv/left.csv"));
        let wizard = wizard_from(&files);
        assert_eq!(wizard.left, FileSource::Path("/srv/left.csv".to_string()));
    }

    #[test]
    fn issues_report_filters_by_severity() {
        let mut report = tempfile::NamedTempFile::new().expect("temp report");
        writeln!(report, "record_key,severity,issue_type,column,message").expect("header");
        writeln!(report, "A-1,ERROR,missing_column,Email,Column missing").expect("row");
        writeln!(report, "A-2,WARN,value_mismatch,Name,Values differ").expect("row");

        let args = IssuesArgs {
            report: report.path().to_path_buf(),
            search: None,
            severity: Some("warning".to_string()),
            kind: None,
        };
        run_issues(&args).expect("filter issues");
    }

    #[test]
    fn issues_report_rejects_unknown_kind() {
        let mut report = tempfile::NamedTempFile::new().expect("temp report");
        writeln!(report, "record_key,severity,issue_type,column,message").expect("header");
        writeln!(report, "A-1,ERROR,missing_column,Email,Column missing").expect("row");

        let known = IssuesArgs {
            report: report.path().to_path_buf(),
            search: None,
            severity: None,
            kind: Some("missing_column".to_string()),
        };
        run_issues(&known).expect("known type filters");

        let unknown = IssuesArgs {
            report: report.path().to_path_buf(),
            search: None,
            severity: None,
            kind: Some("bogus_type".to_string()),
        };
        assert!(run_issues(&unknown).is_err());
    }

    #[test]
    fn issues_report_rejects_unknown_severity() {
        let mut report = tempfile::NamedTempFile::new().expect("temp report");
        writeln!(report, "record_key,severity,issue_type,column,message").expect("header");

        let args = IssuesArgs {
            report: report.path().to_path_buf(),
            search: None,
            severity: Some("fatal".to_string()),
            kind: None,
        };
        assert!(run_issues(&args).is_err());
    }
}
