//! In-memory sample-attributes table.

use crate::error::{GtexError, Result};
use crate::index::{KeyIndex, Strategy};

pub type SampleId = String;

/// One data line of the metadata table, fields aligned to the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleRow {
    /// 1-based line number in the source file.
    pub line: usize,
    pub fields: Vec<String>,
}

impl SampleRow {
    /// Field at `column`, or a parse error naming the line.
    pub fn field(&self, column: usize, name: &str) -> Result<&str> {
        self.fields.get(column).map(String::as_str).ok_or_else(|| {
            GtexError::parse(
                self.line,
                format!(
                    "row has {} fields, column '{}' is field {}",
                    self.fields.len(),
                    name,
                    column + 1
                ),
            )
        })
    }
}

/// Header-indexed rows of the sample-attributes table.
#[derive(Clone, Debug, Default)]
pub struct MetadataTable {
    pub header: Vec<String>,
    pub rows: Vec<SampleRow>,
}

impl MetadataTable {
    pub fn new(header: Vec<String>, rows: Vec<SampleRow>) -> Self {
        Self { header, rows }
    }

    /// Build a table from tab-separated lines, the first one being the header.
    pub fn from_tsv_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut lines = lines.into_iter();
        let header = lines
            .next()
            .map(|h| h.split('\t').map(str::to_string).collect())
            .unwrap_or_default();
        let rows = lines
            .enumerate()
            .map(|(i, l)| SampleRow {
                line: i + 2,
                fields: l.split('\t').map(str::to_string).collect(),
            })
            .collect();
        Self { header, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header field equal to `name`, looked up with `strategy`.
    pub fn column_position(&self, name: &str, strategy: Strategy) -> Result<usize> {
        let mut columns: Box<dyn KeyIndex<String, usize>> = strategy.build_index();
        columns.extend(
            self.header
                .iter()
                .enumerate()
                .map(|(pos, field)| (field.clone(), pos))
                .collect(),
        )?;
        columns
            .lookup(&name.to_string())?
            .copied()
            .ok_or_else(|| GtexError::missing_column(name, "metadata"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_first_occurrence_of_a_column() {
        let table = MetadataTable::from_tsv_lines(["SAMPID\tSMTS\tSMTS", "S1\tBlood\tX"]);
        for strategy in Strategy::ALL {
            assert_eq!(table.column_position("SAMPID", strategy).unwrap(), 0);
            assert_eq!(table.column_position("SMTS", strategy).unwrap(), 1);
        }
    }

    #[test]
    fn column_lookup_is_case_sensitive() {
        let table = MetadataTable::from_tsv_lines(["SAMPID\tSMTS"]);
        let err = table.column_position("smts", Strategy::Hashed).unwrap_err();
        assert!(matches!(err, GtexError::MissingColumn { .. }));
    }

    #[test]
    fn short_row_reports_its_line() {
        let table = MetadataTable::from_tsv_lines(["SAMPID\tSMTS", "S1\tBlood", "S2"]);
        let err = table.rows[1].field(1, "SMTS").unwrap_err();
        assert!(matches!(err, GtexError::Parse { line: 3, .. }));
    }
}
