//! Count extraction engine.
//!
//! Streams a gene-by-sample read count matrix (GCT layout), stops at the
//! first row whose gene symbol matches, and resolves every group member to
//! its count through a key index over the matrix header.
//!
//! Matrix layout:
//! ```text
//! #1.2                      version line, content ignored
//! 56200   17382             rows and sample columns
//! Name  Description  S1 ..  header; sample ids from field 3 on
//! ENSG..  GENEX  5  7 ..    model id, gene symbol, one count per sample
//! ```

use crate::error::{GtexError, Result};
use crate::groups::GroupIndex;
use crate::index::{KeyIndex, Strategy};
use std::io::BufRead;
use tracing::{debug, warn};

pub type ReadCount = u64;

/// Field of each data row holding the gene symbol.
pub const GENE_SYMBOL_FIELD: usize = 1;
/// First field holding sample counts.
pub const FIRST_SAMPLE_FIELD: usize = 2;

/// The three lines preceding the data rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatrixPreamble {
    pub version: String,
    /// Declared (rows, sample columns); informational only.
    pub dims: (usize, usize),
    pub header: Vec<String>,
}

impl MatrixPreamble {
    /// `(sample_id, field position)` for every sample column of the header.
    pub fn sample_columns(&self) -> Vec<(String, usize)> {
        self.header
            .iter()
            .enumerate()
            .skip(FIRST_SAMPLE_FIELD)
            .map(|(pos, id)| (id.clone(), pos))
            .collect()
    }

    pub fn n_samples(&self) -> usize {
        self.header.len().saturating_sub(FIRST_SAMPLE_FIELD)
    }
}

/// The matched data row of the matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneRow {
    /// 1-based line number in the matrix.
    pub line: usize,
    pub fields: Vec<String>,
}

impl GeneRow {
    pub fn model_id(&self) -> &str {
        &self.fields[0]
    }

    pub fn symbol(&self) -> &str {
        &self.fields[GENE_SYMBOL_FIELD]
    }

    /// Count stored in field `column`.
    pub fn count_at(&self, column: usize) -> Result<ReadCount> {
        let raw = self.fields.get(column).ok_or_else(|| {
            GtexError::parse(
                self.line,
                format!(
                    "row for {} has {} fields, expected a count in field {}",
                    self.symbol(),
                    self.fields.len(),
                    column + 1
                ),
            )
        })?;
        raw.trim().parse::<ReadCount>().map_err(|e| {
            GtexError::parse(
                self.line,
                format!("count '{}' in field {}: {}", raw, column + 1, e),
            )
        })
    }
}

/// Counts of one group, in member order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSeries {
    pub name: String,
    pub counts: Vec<ReadCount>,
}

/// Per-group counts in group order; the input of the presentation layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupCounts {
    series: Vec<GroupSeries>,
}

impl GroupCounts {
    pub fn new(series: Vec<GroupSeries>) -> Self {
        Self { series }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroupSeries> {
        self.series.iter()
    }

    pub fn get(&self, name: &str) -> Option<&[ReadCount]> {
        self.series
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.counts.as_slice())
    }

    /// Group names, parallel to [`GroupCounts::values`].
    pub fn labels(&self) -> Vec<String> {
        self.series.iter().map(|s| s.name.clone()).collect()
    }

    /// Counts of each group as floating point values.
    pub fn values(&self) -> Vec<Vec<f64>> {
        self.series
            .iter()
            .map(|s| s.counts.iter().map(|&c| c as f64).collect())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Number of resolved counts across all groups.
    pub fn n_values(&self) -> usize {
        self.series.iter().map(|s| s.counts.len()).sum()
    }
}

impl<'a> IntoIterator for &'a GroupCounts {
    type Item = &'a GroupSeries;
    type IntoIter = std::slice::Iter<'a, GroupSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

/// Line reader tracking 1-based line numbers.
struct Lines<R> {
    reader: R,
    buf: String,
    line: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line: 0,
        }
    }

    /// Next line number and line without its terminator, or `None` at end of input.
    fn next_line(&mut self) -> Result<Option<(usize, &str)>> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        Ok(Some((self.line, self.buf.trim_end_matches(&['\n', '\r'][..]))))
    }

    fn require(&mut self, what: &str) -> Result<String> {
        match self.next_line()? {
            Some((_, line)) => Ok(line.to_string()),
            None => Err(GtexError::malformed_matrix(format!(
                "input ended before the {what} line"
            ))),
        }
    }
}

/// Read the version, dimensions and header lines.
pub fn read_preamble<R: BufRead>(reader: R) -> Result<MatrixPreamble> {
    let mut lines = Lines::new(reader);
    read_preamble_lines(&mut lines)
}

fn read_preamble_lines<R: BufRead>(lines: &mut Lines<R>) -> Result<MatrixPreamble> {
    let version = lines.require("version")?.trim_end().to_string();

    let dims_line = lines.require("dimensions")?;
    let dims: Vec<usize> = dims_line
        .split_whitespace()
        .map(|d| d.parse::<usize>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| {
            GtexError::malformed_matrix(format!("dimensions line '{dims_line}': {e}"))
        })?;
    let dims = match dims.as_slice() {
        [rows, cols] => (*rows, *cols),
        _ => {
            return Err(GtexError::malformed_matrix(format!(
                "dimensions line '{dims_line}' must hold two integers"
            )))
        }
    };

    let header: Vec<String> = lines
        .require("header")?
        .split('\t')
        .map(str::to_string)
        .collect();
    if header.len() < FIRST_SAMPLE_FIELD {
        return Err(GtexError::malformed_matrix(
            "header must name the id and gene symbol columns",
        ));
    }

    let preamble = MatrixPreamble {
        version,
        dims,
        header,
    };
    if preamble.n_samples() != dims.1 {
        warn!(
            declared = dims.1,
            found = preamble.n_samples(),
            "matrix header sample count differs from the dimensions line"
        );
    }
    Ok(preamble)
}

/// Scan data rows until the gene symbol field equals `gene`.
fn find_gene_row<R: BufRead>(lines: &mut Lines<R>, gene: &str) -> Result<Option<GeneRow>> {
    let mut scanned = 0usize;
    while let Some((line_no, line)) = lines.next_line()? {
        if line.is_empty() {
            continue;
        }
        scanned += 1;
        let symbol = line
            .splitn(3, '\t')
            .nth(GENE_SYMBOL_FIELD)
            .ok_or_else(|| GtexError::parse(line_no, "data row has no gene symbol field"))?;
        if symbol == gene {
            let fields = line.split('\t').map(str::to_string).collect();
            debug!(gene, line = line_no, scanned, "matched gene row");
            return Ok(Some(GeneRow {
                line: line_no,
                fields,
            }));
        }
    }
    debug!(gene, scanned, "reached end of matrix");
    Ok(None)
}

/// Extract the read counts of `gene` for every group.
///
/// A gene absent from the matrix gives every group an empty list. Members
/// absent from the matrix header are skipped.
pub fn extract_counts<R: BufRead>(
    matrix: R,
    gene: &str,
    groups: &GroupIndex,
    strategy: Strategy,
) -> Result<GroupCounts> {
    let mut lines = Lines::new(matrix);
    let preamble = read_preamble_lines(&mut lines)?;
    debug!(
        version = %preamble.version,
        rows = preamble.dims.0,
        samples = preamble.n_samples(),
        "read matrix preamble"
    );

    let Some(row) = find_gene_row(&mut lines, gene)? else {
        warn!(gene, "gene not found in count matrix");
        return Ok(GroupCounts::new(
            groups
                .iter()
                .map(|g| GroupSeries {
                    name: g.name.clone(),
                    counts: Vec::new(),
                })
                .collect(),
        ));
    };
    drop(lines);
    debug!(model = row.model_id(), line = row.line, "extracting counts");

    let mut columns: Box<dyn KeyIndex<String, usize>> = strategy.build_index();
    columns.extend(preamble.sample_columns())?;

    let mut series = Vec::with_capacity(groups.len());
    let mut unresolved = 0usize;
    for group in groups {
        let mut counts = Vec::with_capacity(group.members.len());
        for member in &group.members {
            match columns.lookup(member)? {
                Some(&column) => counts.push(row.count_at(column)?),
                None => unresolved += 1,
            }
        }
        series.push(GroupSeries {
            name: group.name.clone(),
            counts,
        });
    }

    debug!(strategy = %strategy, unresolved, "resolved group members");
    Ok(GroupCounts::new(series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::{build_groups, Group};
    use crate::table::MetadataTable;
    use std::io::Cursor;

    const MATRIX: &str = "#1.2\n1 3\nid\tgene\tS1\tS2\tS3\nT1\tGENEX\t5\t7\t9\n";

    fn example_groups(strategy: Strategy) -> GroupIndex {
        let table =
            MetadataTable::from_tsv_lines(["SAMPID\tSMTS", "S1\tBlood", "S2\tBlood", "S3\tBrain"]);
        build_groups(&table, "SMTS", "SAMPID", strategy).unwrap()
    }

    #[test]
    fn extracts_counts_per_group() {
        for strategy in Strategy::ALL {
            let counts =
                extract_counts(Cursor::new(MATRIX), "GENEX", &example_groups(strategy), strategy)
                    .unwrap();
            assert_eq!(counts.labels(), vec!["Blood", "Brain"], "{strategy}");
            assert_eq!(counts.get("Blood").unwrap(), &[5, 7]);
            assert_eq!(counts.get("Brain").unwrap(), &[9]);
        }
    }

    #[test]
    fn absent_gene_gives_empty_groups() {
        for strategy in Strategy::ALL {
            let counts =
                extract_counts(Cursor::new(MATRIX), "NOPE", &example_groups(strategy), strategy)
                    .unwrap();
            assert_eq!(counts.len(), 2);
            assert!(counts.iter().all(|s| s.counts.is_empty()));
        }
    }

    #[test]
    fn first_matching_row_wins() {
        let matrix = "v\n2 2\nid\tgene\tA\tB\nT1\tG\t1\t2\nT2\tG\t3\t4\n";
        let groups = GroupIndex::new(vec![Group {
            name: "all".into(),
            members: vec!["B".into(), "A".into()],
        }]);
        let counts = extract_counts(Cursor::new(matrix), "G", &groups, Strategy::Hashed).unwrap();
        assert_eq!(counts.get("all").unwrap(), &[2, 1]);
    }

    #[test]
    fn members_missing_from_header_are_skipped() {
        let groups = GroupIndex::new(vec![Group {
            name: "Blood".into(),
            members: vec!["S1".into(), "GHOST".into(), "S3".into()],
        }]);
        for strategy in Strategy::ALL {
            let counts = extract_counts(Cursor::new(MATRIX), "GENEX", &groups, strategy).unwrap();
            assert_eq!(counts.get("Blood").unwrap(), &[5, 9], "{strategy}");
        }
    }

    #[test]
    fn duplicate_header_sample_resolves_to_first_column() {
        let matrix = "#1.2\n1 3\nid\tgene\tS1\tS2\tS1\nT1\tGENEX\t5\t7\t11\n";
        for strategy in Strategy::ALL {
            let counts =
                extract_counts(Cursor::new(matrix), "GENEX", &example_groups(strategy), strategy)
                    .unwrap();
            assert_eq!(counts.get("Blood"), Some(&[5, 7][..]), "{strategy}");
            assert_eq!(counts.get("Brain"), Some(&[][..]), "{strategy}");
        }
    }

    #[test]
    fn stops_before_malformed_rows_after_the_match() {
        let matrix = "v\n2 1\nid\tgene\tS1\nT1\tGENEX\t4\nbroken\n";
        let groups = GroupIndex::new(vec![Group {
            name: "g".into(),
            members: vec!["S1".into()],
        }]);
        let counts = extract_counts(Cursor::new(matrix), "GENEX", &groups, Strategy::Binary).unwrap();
        assert_eq!(counts.get("g").unwrap(), &[4]);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let matrix = MATRIX.replace('\n', "\r\n");
        let counts = extract_counts(
            Cursor::new(matrix),
            "GENEX",
            &example_groups(Strategy::Linear),
            Strategy::Linear,
        )
        .unwrap();
        assert_eq!(counts.get("Brain").unwrap(), &[9]);
    }

    #[test]
    fn truncated_preamble_is_malformed() {
        let err = read_preamble(Cursor::new("#1.2\n")).unwrap_err();
        assert!(matches!(err, GtexError::MalformedMatrix { .. }));
    }

    #[test]
    fn dimensions_must_be_two_integers() {
        let err = read_preamble(Cursor::new("#1.2\nmany\nid\tgene\n")).unwrap_err();
        assert!(matches!(err, GtexError::MalformedMatrix { .. }));
        let err = read_preamble(Cursor::new("#1.2\n1 2 3\nid\tgene\n")).unwrap_err();
        assert!(matches!(err, GtexError::MalformedMatrix { .. }));
    }

    #[test]
    fn preamble_exposes_sample_columns() {
        let preamble = read_preamble(Cursor::new(MATRIX)).unwrap();
        assert_eq!(preamble.dims, (1, 3));
        assert_eq!(
            preamble.sample_columns(),
            vec![("S1".to_string(), 2), ("S2".to_string(), 3), ("S3".to_string(), 4)]
        );
    }

    #[test]
    fn non_integer_count_is_a_parse_error() {
        let matrix = "v\n1 1\nid\tgene\tS1\nT1\tGENEX\t4.5\n";
        let groups = GroupIndex::new(vec![Group {
            name: "g".into(),
            members: vec!["S1".into()],
        }]);
        let err = extract_counts(Cursor::new(matrix), "GENEX", &groups, Strategy::Hashed).unwrap_err();
        assert!(matches!(err, GtexError::Parse { line: 4, .. }));
    }

    #[test]
    fn short_gene_row_is_a_parse_error() {
        let matrix = "v\n1 2\nid\tgene\tS1\tS2\nT1\tGENEX\t4\n";
        let groups = GroupIndex::new(vec![Group {
            name: "g".into(),
            members: vec!["S2".into()],
        }]);
        let err = extract_counts(Cursor::new(matrix), "GENEX", &groups, Strategy::Linear).unwrap_err();
        assert!(matches!(err, GtexError::Parse { line: 4, .. }));
    }
}
