//! gtex-core: the sample/metadata join engine of the gtex toolkit.
//!
//! Given a sample-attributes table and a streamed read count matrix, the
//! engine groups samples by an attribute column and collects one gene's
//! counts per group. Every lookup goes through a [`KeyIndex`] backend chosen
//! by [`Strategy`]; the result does not depend on the choice.
//!
//! ```
//! use gtex_core::{build_groups, extract_counts, MetadataTable, Strategy};
//! use std::io::Cursor;
//!
//! let table = MetadataTable::from_tsv_lines(["SAMPID\tSMTS", "S1\tBlood", "S2\tBrain"]);
//! let groups = build_groups(&table, "SMTS", "SAMPID", Strategy::Hashed)?;
//! let matrix = "#1.2\n1 2\nName\tDescription\tS1\tS2\nENSG1\tGENEX\t5\t9\n";
//! let counts = extract_counts(Cursor::new(matrix), "GENEX", &groups, Strategy::Hashed)?;
//! assert_eq!(counts.get("Brain"), Some(&[9][..]));
//! # Ok::<(), gtex_core::GtexError>(())
//! ```

pub mod error;
pub mod extract;
pub mod groups;
pub mod index;
pub mod stats;
pub mod table;

pub use error::{ErrorKind, GtexError, Result};
pub use extract::{
    extract_counts, read_preamble, GeneRow, GroupCounts, GroupSeries, MatrixPreamble, ReadCount,
};
pub use groups::{build_groups, Group, GroupIndex, SAMPLE_ID_COLUMN};
pub use index::{
    binary_search, linear_search, FieldKey, HashedIndex, IndexKey, KeyIndex, LinearIndex,
    SortedIndex, Strategy,
};
pub use table::{MetadataTable, SampleId, SampleRow};
