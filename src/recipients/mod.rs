//! Recipient loading from CSV.
//!
//! Two layouts are accepted:
//! - a header row with an `email` column (matched case-insensitively)
//! - a headerless file where the first column is the address
//!
//! Addresses are trimmed, must contain `@`, and are de-duplicated keeping
//! the first occurrence.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

const UTF8_BOM: char = '\u{feff}';
const EMAIL_COLUMN: &str = "email";

/// Recipient loading error type
#[derive(Debug, Error)]
pub enum RecipientError {
    #[error("CSV file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unable to read CSV file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Load recipient addresses from the CSV file at `path`.
///
/// Returns an empty list for a file with no usable rows; deciding whether
/// that is fatal is left to the caller.
pub fn load_recipients(path: &Path) -> Result<Vec<String>, RecipientError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            RecipientError::NotFound(path.to_path_buf())
        } else {
            RecipientError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_recipients(&content).map_err(|source| RecipientError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse recipient addresses from CSV text.
pub fn parse_recipients(content: &str) -> Result<Vec<String>, csv::Error> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let first_line = content.lines().next().unwrap_or_default();

    let candidates = if first_line.to_lowercase().contains(EMAIL_COLUMN) {
        from_header_column(content)?
    } else {
        from_first_column(content)?
    };

    Ok(dedup_preserving_order(candidates))
}

fn reader(content: &str, has_headers: bool) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(content.as_bytes())
}

fn from_header_column(content: &str) -> Result<Vec<String>, csv::Error> {
    let mut rdr = reader(content, true);
    let column = rdr
        .headers()?
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(EMAIL_COLUMN));

    let Some(column) = column else {
        tracing::warn!("Header row mentions email but has no `email` column");
        return Ok(Vec::new());
    };

    let mut emails = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if let Some(email) = record.get(column).and_then(accept) {
            emails.push(email);
        }
    }
    Ok(emails)
}

fn from_first_column(content: &str) -> Result<Vec<String>, csv::Error> {
    let mut emails = Vec::new();
    for record in reader(content, false).records() {
        let record = record?;
        let Some(email) = record.get(0).and_then(accept) else {
            continue;
        };
        // Unrecognized header variants such as "E-mail address"
        if email.to_lowercase().starts_with(EMAIL_COLUMN) {
            continue;
        }
        emails.push(email);
    }
    Ok(emails)
}

fn accept(field: &str) -> Option<String> {
    let email = field.trim();
    (!email.is_empty() && email.contains('@')).then(|| email.to_string())
}

fn dedup_preserving_order(emails: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    emails
        .into_iter()
        .filter(|email| seen.insert(email.clone()))
        .collect()
}
