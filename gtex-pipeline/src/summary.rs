//! Per-group summary statistics.

use anyhow::Result;
use gtex_core::stats::{summarize, Summary};
use gtex_core::GroupCounts;
use std::io::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub name: String,
    pub n: usize,
    /// `None` for a group without counts; statistics are never taken of an empty group.
    pub stats: Option<Summary>,
}

/// Count and descriptive statistics of every group, in group order.
///
/// A group with no resolved counts (a gene absent from the matrix, or no
/// member present in the matrix header) is reported with `stats: None`.
pub fn summarize_groups(counts: &GroupCounts) -> gtex_core::Result<Vec<GroupSummary>> {
    counts
        .labels()
        .into_iter()
        .zip(counts.values())
        .map(|(name, values)| {
            let stats = if values.is_empty() {
                None
            } else {
                Some(summarize(&values)?)
            };
            Ok(GroupSummary {
                name,
                n: values.len(),
                stats,
            })
        })
        .collect()
}

fn format_stat(summary: Option<&Summary>, pick: fn(&Summary) -> f64) -> String {
    summary.map_or_else(|| "NA".to_string(), |s| format!("{:.4}", pick(s)))
}

/// Write summaries as TSV with a `group n mean stdev median min max` header.
pub fn write_summary_tsv<W: Write>(writer: W, summaries: &[GroupSummary]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    wtr.write_record(["group", "n", "mean", "stdev", "median", "min", "max"])?;
    for s in summaries {
        let stats = s.stats.as_ref();
        wtr.write_record([
            s.name.clone(),
            s.n.to_string(),
            format_stat(stats, |x| x.mean),
            format_stat(stats, |x| x.stdev),
            format_stat(stats, |x| x.median),
            format_stat(stats, |x| x.min),
            format_stat(stats, |x| x.max),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gtex_core::GroupSeries;

    fn counts() -> GroupCounts {
        GroupCounts::new(vec![
            GroupSeries {
                name: "Blood".to_string(),
                counts: vec![2, 4, 6],
            },
            GroupSeries {
                name: "Lung".to_string(),
                counts: vec![],
            },
        ])
    }

    #[test]
    fn summaries_follow_group_order() {
        let summaries = summarize_groups(&counts()).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "Blood");
        assert_eq!(summaries[0].n, 3);
        let blood = summaries[0].stats.as_ref().unwrap();
        assert_relative_eq!(blood.mean, 4.0);
        assert_relative_eq!(blood.stdev, 1.633, epsilon = 1e-3);
        assert_relative_eq!(blood.median, 4.0);
        assert_eq!(summaries[1].n, 0);
        assert_eq!(summaries[1].stats, None);
    }

    #[test]
    fn tsv_marks_empty_groups_na() {
        let mut out = Vec::new();
        write_summary_tsv(&mut out, &summarize_groups(&counts()).unwrap()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "group\tn\tmean\tstdev\tmedian\tmin\tmax\n\
             Blood\t3\t4.0000\t1.6330\t4.0000\t2.0000\t6.0000\n\
             Lung\t0\tNA\tNA\tNA\tNA\tNA\n"
        );
    }
}
