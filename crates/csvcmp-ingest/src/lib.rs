//! CSV column discovery for comparison runs.
//!
//! Two paths exist for learning a file's columns:
//!
//! - [`sniff_header`] reads only a bounded prefix of the file and parses the
//!   first line. This is the cheap path used while a run is being configured,
//!   where the file may be large and only the header matters.
//! - [`read_csv_table`] is a full read through the `csv` crate, used when the
//!   guess engine also needs sample values.

pub mod header;
pub mod table;

pub use header::{HEADER_SNIFF_BYTES, parse_header_line, sniff_header};
pub use table::{CsvTable, read_csv_table, sample_values};
