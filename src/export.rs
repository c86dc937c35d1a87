//! CSV and plain-file output.

use std::fs;
use std::path::Path;
use tracing::info;

use crate::person::Person;
use crate::subject::SubjectAnalysis;
use crate::utils::Result;

/// Types that can be written as one CSV row
pub trait CsvRecord {
    fn headers() -> Vec<&'static str>;
    fn record(&self) -> Vec<String>;
}

impl CsvRecord for Person {
    fn headers() -> Vec<&'static str> {
        vec!["first_name", "last_name", "full_name", "email", "job_title", "company"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.full_name.clone(),
            self.email.clone(),
            self.job_title.clone(),
            self.company.clone(),
        ]
    }
}

impl CsvRecord for SubjectAnalysis {
    fn headers() -> Vec<&'static str> {
        vec!["subject", "length", "word_count", "spam_score", "rating", "issues"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.subject.clone(),
            self.length.to_string(),
            self.word_count.to_string(),
            self.spam_score.to_string(),
            self.rating.as_str().to_string(),
            self.issues.join("; "),
        ]
    }
}

/// A header row plus data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: &[&str]) -> Self {
        CsvTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) -> &mut Self {
        self.rows.push(row);
        self
    }

    pub fn from_records<T: CsvRecord>(records: &[T]) -> Self {
        let mut table = CsvTable::new(&T::headers());
        for record in records {
            table.push_row(record.record());
        }
        table
    }

    /// One column named `header`, one row per value
    pub fn single_column(header: &str, values: &[String]) -> Self {
        let mut table = CsvTable::new(&[header]);
        for value in values {
            table.push_row(vec![value.clone()]);
        }
        table
    }

    /// Header line followed by one line per row, separated by `\n`
    pub fn to_csv(&self) -> String {
        std::iter::once(&self.headers)
            .chain(self.rows.iter())
            .map(|row| row.iter().map(|f| quote_field(f)).collect::<Vec<_>>().join(","))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Quote a field when it contains a delimiter, quote or line break
pub fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write generated output (CSV, text or HTML) to `path`
pub fn write_file<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    fs::write(path.as_ref(), contents)?;
    info!(path = %path.as_ref().display(), bytes = contents.len(), "wrote output");
    Ok(())
}
