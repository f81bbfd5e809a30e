use std::path::Path;

use crate::error::EditError;
use crate::types::{RowKind, WordAlignmentRow};

const WORD_KIND: &str = "words";
const MIN_FIELDS: usize = 4;

/// Rows of a delimited alignment file, header dropped.
#[derive(Debug, Clone, Default)]
pub struct AlignmentTable {
    rows: Vec<WordAlignmentRow>,
}

impl AlignmentTable {
    pub fn load(path: &Path) -> Result<Self, EditError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| EditError::io("read alignment file", e))?;
        Self::parse(&data)
    }

    /// Parses `start,end,label,kind` rows after one header line.
    pub fn parse(data: &str) -> Result<Self, EditError> {
        let mut rows = Vec::new();
        for (line_idx, line) in data.lines().enumerate().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            rows.push(parse_row(line, line_idx + 1)?);
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[WordAlignmentRow] {
        &self.rows
    }

    pub fn words(&self) -> Vec<WordAlignmentRow> {
        self.rows
            .iter()
            .filter(|row| row.kind == RowKind::Word)
            .cloned()
            .collect()
    }
}

fn parse_row(line: &str, line_no: usize) -> Result<WordAlignmentRow, EditError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return Err(EditError::invalid_input(format!(
            "alignment line {line_no}: expected at least {MIN_FIELDS} fields, got {}",
            fields.len()
        )));
    }
    let start_time = parse_time(fields[0], "start", line_no)?;
    let end_time = parse_time(fields[1], "end", line_no)?;
    let kind = if fields[3] == WORD_KIND {
        RowKind::Word
    } else {
        RowKind::Other
    };
    Ok(WordAlignmentRow {
        start_time,
        end_time,
        label: fields[2].to_string(),
        kind,
    })
}

fn parse_time(field: &str, which: &str, line_no: usize) -> Result<f64, EditError> {
    let value: f64 = field.parse().map_err(|_| {
        EditError::invalid_input(format!(
            "alignment line {line_no}: {which} time '{field}' is not a number"
        ))
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(EditError::invalid_input(format!(
            "alignment line {line_no}: {which} time {value} must be finite and non-negative"
        )));
    }
    Ok(value)
}
