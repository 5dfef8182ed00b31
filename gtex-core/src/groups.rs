//! Grouping engine: sample-attributes rows to group membership lists.

use crate::error::Result;
use crate::index::{KeyIndex, Strategy};
use crate::table::{MetadataTable, SampleId};
use tracing::{debug, warn};

/// Default name of the sample id column in GTEx attribute tables.
pub const SAMPLE_ID_COLUMN: &str = "SAMPID";

/// One group and its members in metadata file order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub members: Vec<SampleId>,
}

/// Groups in first-seen order. Each sample id belongs to at most one group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupIndex {
    groups: Vec<Group>,
}

impl GroupIndex {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.groups.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of member samples across all groups.
    pub fn n_samples(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }
}

impl<'a> IntoIterator for &'a GroupIndex {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Partition the table's samples by the value of `group_column`.
///
/// Both column names resolve to their first occurrence in the header; a
/// missing name is a configuration error. Rows are visited in file order and
/// groups are created on first encounter. A sample id seen on an earlier row
/// keeps that row's group and the later rows are skipped.
pub fn build_groups(
    table: &MetadataTable,
    group_column: &str,
    id_column: &str,
    strategy: Strategy,
) -> Result<GroupIndex> {
    let group_pos = table.column_position(group_column, strategy)?;
    let id_pos = table.column_position(id_column, strategy)?;
    debug!(group_column, group_pos, id_column, id_pos, "resolved metadata columns");

    let mut keyed = Vec::with_capacity(table.len());
    for row in &table.rows {
        let sample_id = row.field(id_pos, id_column)?;
        let group_key = row.field(group_pos, group_column)?;
        keyed.push((sample_id, group_key, row.line));
    }

    let mut first_rows: Box<dyn KeyIndex<SampleId, usize>> = strategy.build_index();
    first_rows.extend(
        keyed
            .iter()
            .map(|(sample_id, _, line)| (sample_id.to_string(), *line))
            .collect(),
    )?;

    let mut slots: Box<dyn KeyIndex<String, usize>> = strategy.build_index();
    let mut groups: Vec<Group> = Vec::new();
    let mut skipped = 0usize;

    for (sample_id, group_key, line) in keyed {
        let sample_id = sample_id.to_string();
        let occurrences = first_rows.lookup_all(&sample_id)?;
        if let Some(&&first) = occurrences.first() {
            if first != line {
                skipped += 1;
                continue;
            }
            if occurrences.len() > 1 {
                warn!(
                    sample = %sample_id,
                    lines = ?occurrences,
                    "sample id repeats in metadata; keeping line {}",
                    first
                );
            }
        }

        let group_key = group_key.to_string();
        let slot = match slots.lookup(&group_key)? {
            Some(&slot) => slot,
            None => {
                let slot = groups.len();
                slots.insert(group_key.clone(), slot)?;
                groups.push(Group {
                    name: group_key,
                    members: Vec::new(),
                });
                slot
            }
        };
        groups[slot].members.push(sample_id);
    }

    debug!(
        strategy = %strategy,
        n_groups = groups.len(),
        skipped_duplicates = skipped,
        "grouping complete"
    );
    Ok(GroupIndex::new(groups))
}
