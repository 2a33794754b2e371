//! CSV bulk import: template download, parse to header-mapped rows, preview,
//! required-field and per-row form checks.

use std::collections::BTreeMap;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::cache::QueryKey;
use crate::error::{AppError, FieldError};

/// One data row keyed by header.
pub type CsvRow = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CsvKind {
    Investors,
    Startups,
    Mentors,
    Tools,
}

impl CsvKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CsvKind::Investors => "investors",
            CsvKind::Startups => "startups",
            CsvKind::Mentors => "mentors",
            CsvKind::Tools => "tools",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "investors" => Some(CsvKind::Investors),
            "startups" => Some(CsvKind::Startups),
            "mentors" => Some(CsvKind::Mentors),
            "tools" => Some(CsvKind::Tools),
            _ => None,
        }
    }

    pub fn template_file_name(&self) -> String {
        format!("{}_template.csv", self.as_str())
    }

    pub fn query_key(&self) -> QueryKey {
        match self {
            CsvKind::Investors => QueryKey::Investors,
            CsvKind::Startups => QueryKey::Startups,
            CsvKind::Mentors => QueryKey::Mentors,
            CsvKind::Tools => QueryKey::Tools,
        }
    }
}

/// A form type that can be filled from a CSV row.
pub trait CsvRecord: Sized {
    /// Columns that must be present and non-blank on every row.
    const REQUIRED: &'static [&'static str];
    /// Column set and example values for the downloadable template.
    const TEMPLATE: &'static [(&'static str, &'static str)];

    /// Converts a row; `Err` carries a message for values that cannot be mapped.
    fn from_row(row: &CsvRow) -> Result<Self, String>;

    /// Same checks the JSON API applies to the form.
    fn row_errors(&self) -> Vec<FieldError>;
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CsvPreview {
    /// Header row, in file order
    pub headers: Vec<String>,
    /// Data rows keyed by header
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<CsvRow>,
    /// Human-readable problems; the import is refused while this is non-empty
    pub errors: Vec<String>,
}

/// Parsed rows plus the forms they converted into.
#[derive(Debug)]
pub struct Prepared<F> {
    pub preview: CsvPreview,
    pub forms: Vec<F>,
}

impl<F> Prepared<F> {
    /// The forms, or every collected error if the batch is not clean.
    pub fn into_forms(self) -> Result<Vec<F>, AppError> {
        if self.preview.errors.is_empty() {
            Ok(self.forms)
        } else {
            Err(AppError::InvalidCsv(self.preview.errors))
        }
    }
}

/// Parses a header row plus data rows. Blank lines are skipped and short rows
/// are accepted; cells are trimmed.
pub fn parse(input: &str) -> Result<(Vec<String>, Vec<CsvRow>), AppError> {
    let input = input.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let row: CsvRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(AppError::InvalidRequest("No valid data found in CSV file".to_string()));
    }
    Ok((headers, rows))
}

/// One message per missing or blank required cell; rows are numbered from 1.
pub fn check_required(rows: &[CsvRow], required: &[&str]) -> Vec<String> {
    rows.iter()
        .enumerate()
        .flat_map(|(index, row)| missing_in_row(index + 1, row, required))
        .collect()
}

fn missing_in_row(n: usize, row: &CsvRow, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|field| cell(row, field).is_none())
        .map(|field| format!("Row {}: Missing required field '{}'", n, field))
        .collect()
}

/// Parses, checks and converts an upload without writing anything. Errors
/// are listed in row order.
pub fn prepare<F: CsvRecord>(input: &str) -> Result<Prepared<F>, AppError> {
    let (headers, rows) = parse(input)?;
    let mut errors = Vec::new();
    let mut forms = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let n = index + 1;
        let missing = missing_in_row(n, row, F::REQUIRED);
        if !missing.is_empty() {
            errors.extend(missing);
            continue;
        }

        match F::from_row(row) {
            Ok(form) => {
                let problems = form.row_errors();
                if problems.is_empty() {
                    forms.push(form);
                } else {
                    errors.extend(problems.into_iter().map(|e| format!("Row {}: {}", n, e.message)));
                }
            }
            Err(message) => errors.push(format!("Row {}: {}", n, message)),
        }
    }

    Ok(Prepared {
        preview: CsvPreview { headers, rows, errors },
        forms,
    })
}

/// Header row plus one example row for `F`.
pub fn template<F: CsvRecord>() -> Result<String, AppError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(F::TEMPLATE.iter().map(|(header, _)| *header))?;
    writer.write_record(F::TEMPLATE.iter().map(|(_, value)| *value))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::InternalError(e.to_string()))
}

// --- Cell helpers used by the per-entity converters ---

/// Trimmed, non-blank cell value.
pub fn cell(row: &CsvRow, field: &str) -> Option<String> {
    row.get(field)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

/// Integer cell; blank or unparsable values become 0.
pub fn int_cell(row: &CsvRow, field: &str) -> i32 {
    opt_int_cell(row, field).unwrap_or(0)
}

pub fn opt_int_cell(row: &CsvRow, field: &str) -> Option<i32> {
    cell(row, field).and_then(|v| v.parse::<i32>().ok())
}

/// Boolean cell accepting true/false, 1/0, yes/no; anything else falls back to `default`.
pub fn bool_cell(row: &CsvRow, field: &str, default: bool) -> bool {
    match cell(row, field).map(|v| v.to_lowercase()).as_deref() {
        Some("true") | Some("1") | Some("yes") => true,
        Some("false") | Some("0") | Some("no") => false,
        _ => default,
    }
}

/// Maps a status cell through `parse`; blank means `None`.
pub fn enum_cell<T>(row: &CsvRow, field: &str, parse: fn(&str) -> Option<T>) -> Result<Option<T>, String> {
    match cell(row, field) {
        None => Ok(None),
        Some(value) => parse(&value)
            .map(Some)
            .ok_or_else(|| format!("Invalid value '{}' for field '{}'", value, field)),
    }
}
