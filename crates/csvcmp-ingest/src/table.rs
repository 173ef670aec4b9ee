//! Full CSV reads used when sample values are needed alongside headers.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

/// An in-memory CSV table: normalized headers plus string rows.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads a CSV file with its first row as the header.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => {
            let record = record.with_context(|| format!("read header: {}", path.display()))?;
            record.iter().map(normalize_header).collect()
        }
        None => Vec::new(),
    };
    let mut rows = Vec::new();
    for record in records {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).unwrap_or("");
            row.push(normalize_cell(value));
        }
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        rows.push(row);
    }
    Ok(CsvTable { headers, rows })
}

/// Collects up to `limit` non-empty sample values per column.
///
/// The samples feed the guess engine's type detection and value overlap
/// checks.
#[must_use]
pub fn sample_values(table: &CsvTable, limit: usize) -> BTreeMap<String, Vec<String>> {
    let mut samples = BTreeMap::new();
    for (col_idx, header) in table.headers.iter().enumerate() {
        let values: Vec<String> = table
            .rows
            .iter()
            .take(limit)
            .filter_map(|row| row.get(col_idx))
            .filter(|value| !value.is_empty())
            .cloned()
            .collect();
        samples.insert(header.clone(), values);
    }
    samples
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{contents}").expect("write csv");
        file
    }

    #[test]
    fn reads_headers_and_rows() {
        let file = write_csv("id, name ,email\n1,Jane,jane@example.com\n2,Joan,\n");
        let table = read_csv_table(file.path()).expect("read table");
        assert_eq!(table.headers, vec!["id", "name", "email"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "Jane");
    }

    #[test]
    fn blank_rows_are_skipped() {
        let file = write_csv("a,b\n,,\n1,2\n");
        let table = read_csv_table(file.path()).expect("read table");
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn sample_values_skip_empty_cells() {
        let file = write_csv("a,b\n1,\n2,x\n");
        let table = read_csv_table(file.path()).expect("read table");
        let samples = sample_values(&table, 200);
        assert_eq!(samples["a"], vec!["1", "2"]);
        assert_eq!(samples["b"], vec!["x"]);
    }
}
