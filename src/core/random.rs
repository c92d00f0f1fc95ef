// random.rs - Randomized groupings derived from a categorical column

use crate::data::{Column, ColumnKind, MetadataColumn, MetadataTable};
use crate::error::{MetadataError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

pub const DEFAULT_N_COLUMNS: usize = 3;
pub const DEFAULT_COLUMN_NAME_PREFIX: &str = "random-grouping-";
pub const DEFAULT_COLUMN_VALUE_PREFIX: &str = "fake-group-";

/// How output labels relate to the input categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupPolicy {
    /// Replace each category with a synthetic `{value_prefix}{index}` label
    #[default]
    FreshLabels,
    /// Keep the original category values and only permute them
    PreserveLabels,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RandomGroupsOptions {
    pub n_columns: usize,
    pub column_name_prefix: String,
    pub column_value_prefix: String,
    /// Append `.n={count}` to synthetic labels
    pub encode_sample_size: bool,
    pub policy: GroupPolicy,
}

impl Default for RandomGroupsOptions {
    fn default() -> Self {
        Self {
            n_columns: DEFAULT_N_COLUMNS,
            column_name_prefix: DEFAULT_COLUMN_NAME_PREFIX.to_string(),
            column_value_prefix: DEFAULT_COLUMN_VALUE_PREFIX.to_string(),
            encode_sample_size: false,
            policy: GroupPolicy::FreshLabels,
        }
    }
}

/// Map every distinct value (missing included) to its output label, in
/// first-occurrence order
fn label_mapping(
    values: &[Option<String>],
    options: &RandomGroupsOptions,
) -> HashMap<Option<String>, Option<String>> {
    let mut order: Vec<&Option<String>> = Vec::new();
    let mut counts: HashMap<&Option<String>, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    order
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let label = match options.policy {
                GroupPolicy::PreserveLabels => value.clone(),
                GroupPolicy::FreshLabels => {
                    let mut label = format!("{}{}", options.column_value_prefix, index);
                    if options.encode_sample_size {
                        label.push_str(&format!(".n={}", counts[value]));
                    }
                    Some(label)
                }
            };
            (value.clone(), label)
        })
        .collect()
}

/// Derive `n_columns` shuffled groupings from a categorical column.
///
/// The first output column relabels each row then permutes the labels across
/// rows; each further column is an independent permutation of the first.
/// Group sizes are preserved exactly. The input column is not part of the
/// result.
pub fn random_groups<R: Rng + ?Sized>(
    column: &MetadataColumn,
    options: &RandomGroupsOptions,
    rng: &mut R,
) -> Result<MetadataTable> {
    if options.n_columns == 0 {
        return Err(MetadataError::Configuration(
            "Number of output columns must be at least 1".to_string(),
        ));
    }
    let values = match column.kind() {
        ColumnKind::Categorical => column.data().to_strings(),
        ColumnKind::Numeric => {
            return Err(MetadataError::Configuration(format!(
                "Column '{}' is numeric; random groups require a categorical column",
                column.name()
            )))
        }
    };

    let mapping = label_mapping(&values, options);
    log::debug!(
        "Randomizing '{}': {} groups across {} ids",
        column.name(),
        mapping.len(),
        values.len()
    );

    let mut first: Vec<Option<String>> = values
        .iter()
        .map(|v| mapping.get(v).cloned().flatten())
        .collect();
    first.shuffle(rng);

    let mut columns = Vec::with_capacity(options.n_columns);
    for i in 1..options.n_columns {
        let mut shuffled = first.clone();
        shuffled.shuffle(rng);
        columns.push(Column::categorical(
            format!("{}{}", options.column_name_prefix, i),
            shuffled,
        ));
    }
    columns.insert(
        0,
        Column::categorical(format!("{}0", options.column_name_prefix), first),
    );

    MetadataTable::new(column.id_header(), column.ids().to_vec(), columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const N_ITERATIONS: usize = 100;

    fn groups(values: &[&str], names: &[&str], column: &str) -> MetadataColumn {
        MetadataColumn::new(
            "id",
            names.iter().map(|s| s.to_string()).collect(),
            Column::categorical(column, values.iter().map(|v| Some(v.to_string())).collect()),
        )
        .unwrap()
    }

    fn abab() -> MetadataColumn {
        groups(&["a", "b", "a", "b"], &["sample1", "sample2", "sample3", "s4"], "groups")
    }

    fn labels(table: &MetadataTable, name: &str) -> Vec<Option<String>> {
        table.column_ref(name).unwrap().data.to_strings()
    }

    fn sorted_counts(values: &[Option<String>]) -> Vec<usize> {
        let mut counts: HashMap<&Option<String>, usize> = HashMap::new();
        for v in values {
            *counts.entry(v).or_insert(0) += 1;
        }
        let mut counts: Vec<usize> = counts.into_values().collect();
        counts.sort();
        counts
    }

    fn one_column(prefix: &str, value_prefix: &str) -> RandomGroupsOptions {
        RandomGroupsOptions {
            n_columns: 1,
            column_name_prefix: prefix.to_string(),
            column_value_prefix: value_prefix.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_random_groups_shape_41() {
        let mut rng = StdRng::seed_from_u64(42);
        let md = abab();
        let obs = random_groups(&md, &one_column("random-grouping-", "fake-group-"), &mut rng).unwrap();

        assert_eq!(obs.len(), 4);
        assert_eq!(obs.column_names(), vec!["random-grouping-0"]);
        let col = labels(&obs, "random-grouping-0");
        let mut distinct: Vec<&str> = col.iter().flatten().map(|s| s.as_str()).collect();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct, vec!["fake-group-0", "fake-group-1"]);
        assert_eq!(sorted_counts(&col), vec![2, 2]);

        // Randomization of id/label association is occurring
        let any_different = (0..N_ITERATIONS).any(|_| {
            let again = random_groups(&md, &one_column("random-grouping-", "fake-group-"), &mut rng).unwrap();
            labels(&again, "random-grouping-0") != col
        });
        assert!(
            any_different,
            "All random groupings in {} iterations were identical",
            N_ITERATIONS
        );
    }

    #[test]
    fn test_random_groups_shape_33() {
        let mut rng = StdRng::seed_from_u64(7);
        let md = groups(
            &["a", "b", "c", "a", "b", "c", "a", "b", "c"],
            &["sample1", "sample2", "sample3", "samplea", "sampleb", "sc", "sample1_w", "ctl1", "ctl3"],
            "groups",
        );
        let obs = random_groups(&md, &RandomGroupsOptions::default(), &mut rng).unwrap();
        assert_eq!(obs.len(), 9);
        assert_eq!(
            obs.column_names(),
            vec!["random-grouping-0", "random-grouping-1", "random-grouping-2"]
        );
        for name in obs.column_names() {
            let col = labels(&obs, name);
            assert_eq!(sorted_counts(&col), vec![3, 3, 3]);
        }
        let c0 = labels(&obs, "random-grouping-0");
        let c1 = labels(&obs, "random-grouping-1");
        let c2 = labels(&obs, "random-grouping-2");
        assert!(c0 != c1 || c0 != c2 || c1 != c2);
    }

    #[test]
    fn test_first_occurrence_order_and_sample_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let md = groups(&["b", "a", "b", "b"], &["w", "x", "y", "z"], "groups");
        let options = RandomGroupsOptions {
            n_columns: 1,
            encode_sample_size: true,
            ..Default::default()
        };
        let obs = random_groups(&md, &options, &mut rng).unwrap();
        let col = labels(&obs, "random-grouping-0");
        let n0 = col.iter().filter(|v| v.as_deref() == Some("fake-group-0.n=3")).count();
        let n1 = col.iter().filter(|v| v.as_deref() == Some("fake-group-1.n=1")).count();
        assert_eq!((n0, n1), (3, 1));
    }

    #[test]
    fn test_alt_prefixes() {
        let mut rng = StdRng::seed_from_u64(3);
        let obs = random_groups(&abab(), &one_column("1", "1"), &mut rng).unwrap();
        assert_eq!(obs.column_names(), vec!["10"]);
        let mut distinct: Vec<String> = labels(&obs, "10").into_iter().flatten().collect();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct, vec!["10".to_string(), "11".to_string()]);
    }

    #[test]
    fn test_preserve_labels() {
        let mut rng = StdRng::seed_from_u64(11);
        let options = RandomGroupsOptions {
            n_columns: 2,
            policy: GroupPolicy::PreserveLabels,
            ..Default::default()
        };
        let obs = random_groups(&abab(), &options, &mut rng).unwrap();
        for name in obs.column_names() {
            let mut values: Vec<String> = labels(&obs, name).into_iter().flatten().collect();
            values.sort();
            assert_eq!(values, vec!["a", "a", "b", "b"]);
        }
    }

    #[test]
    fn test_missing_values_form_a_group() {
        let mut rng = StdRng::seed_from_u64(5);
        let md = MetadataColumn::new(
            "id",
            vec!["a".into(), "b".into(), "c".into()],
            Column::categorical("g", vec![Some("x".into()), None, Some("x".into())]),
        )
        .unwrap();
        let obs = random_groups(&md, &one_column("r", "g"), &mut rng).unwrap();
        let col = labels(&obs, "r0");
        assert_eq!(col.iter().filter(|v| v.as_deref() == Some("g0")).count(), 2);
        assert_eq!(col.iter().filter(|v| v.as_deref() == Some("g1")).count(), 1);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let options = RandomGroupsOptions::default();
        let a = random_groups(&abab(), &options, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = random_groups(&abab(), &options, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = StdRng::seed_from_u64(0);
        let zero = RandomGroupsOptions {
            n_columns: 0,
            ..Default::default()
        };
        assert!(matches!(
            random_groups(&abab(), &zero, &mut rng),
            Err(MetadataError::Configuration(_))
        ));

        let numeric = MetadataColumn::new(
            "id",
            vec!["a".into()],
            Column::numeric("n", vec![Some(1.0)]),
        )
        .unwrap();
        assert!(matches!(
            random_groups(&numeric, &RandomGroupsOptions::default(), &mut rng),
            Err(MetadataError::Configuration(_))
        ));
    }
}
