//! Bounded header sniffing.
//!
//! Reads at most [`HEADER_SNIFF_BYTES`] of a file and parses the first line
//! as a CSV header. The truncation bound is part of the contract: a header
//! longer than the prefix is parsed as far as the prefix reaches.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Maximum number of bytes read when sniffing a header.
pub const HEADER_SNIFF_BYTES: u64 = 65536;

/// Splits a single CSV header line into trimmed, non-empty field names.
///
/// Commas inside double-quoted fields do not split; a doubled quote inside a
/// quoted field is a literal quote. Quote characters themselves are not part
/// of the field value.
#[must_use]
pub fn parse_header_line(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '"' {
            if in_quotes && chars.get(i + 1) == Some(&'"') {
                current.push('"');
                i += 1;
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == ',' && !in_quotes {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
        i += 1;
    }
    if !current.is_empty() || line.ends_with(',') {
        fields.push(current.trim().to_string());
    }
    fields.retain(|field| !field.is_empty());
    fields
}

/// Reads the first line of `path` (bounded by [`HEADER_SNIFF_BYTES`]) and
/// parses it as a CSV header.
pub fn sniff_header(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("open csv: {}", path.display()))?;
    let mut prefix = Vec::new();
    file.take(HEADER_SNIFF_BYTES)
        .read_to_end(&mut prefix)
        .with_context(|| format!("read csv prefix: {}", path.display()))?;
    let text = String::from_utf8_lossy(&prefix);
    let first_line = text
        .split('\n')
        .next()
        .unwrap_or("")
        .trim_end_matches('\r');
    tracing::debug!(path = %path.display(), bytes = prefix.len(), "sniffed header prefix");
    Ok(parse_header_line(first_line))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn plain_fields_split_on_commas() {
        assert_eq!(parse_header_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn quoted_comma_does_not_split() {
        assert_eq!(parse_header_line(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn doubled_quote_is_literal() {
        assert_eq!(parse_header_line(r#"a,"b""c",d"#), vec!["a", "b\"c", "d"]);
    }

    #[test]
    fn fields_are_trimmed_and_empties_dropped() {
        assert_eq!(parse_header_line(" a , ,b,,"), vec!["a", "b"]);
        assert_eq!(parse_header_line(""), Vec::<String>::new());
    }

    #[test]
    fn trailing_comma_adds_no_field() {
        assert_eq!(parse_header_line("a,b,"), vec!["a", "b"]);
    }

    #[test]
    fn sniff_reads_only_first_line() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "id,\"full, name\",email").expect("write header");
        writeln!(file, "1,Jane,jane@example.com").expect("write row");
        let header = sniff_header(file.path()).expect("sniff");
        assert_eq!(header, vec!["id", "full, name", "email"]);
    }

    #[test]
    fn sniff_truncates_at_the_byte_bound() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let long = "x".repeat(HEADER_SNIFF_BYTES as usize + 100);
        write!(file, "a,{long}").expect("write header");
        let header = sniff_header(file.path()).expect("sniff");
        assert_eq!(header.len(), 2);
        assert!(header[1].len() < HEADER_SNIFF_BYTES as usize);
    }
}
