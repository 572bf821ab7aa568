use crate::block::BlockIndex;
use serde::Serialize;
use std::collections::BTreeSet;

/// Cross-dataset candidate pairs: every `(source_id, target_id)` whose
/// records share at least one blocking key. Enumeration is lazy and
/// restartable; each iteration re-derives the same pairs without touching
/// shared state.
pub struct CandidatePairs<'a> {
    source: &'a BlockIndex,
    target: &'a BlockIndex,
}

/// Blocking-effectiveness numbers. These measure how well the keys bound
/// the comparison volume, not matching correctness.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockingStats {
    /// Pairs produced across all shared keys, duplicates included.
    pub total_pairs: usize,
    pub distinct_pairs: usize,
    /// Distinct pairs over the full cross-product size.
    pub selectivity: f64,
    /// Total over distinct; how often multi-key overlap repeats a pair.
    pub duplicate_ratio: f64,
}

impl<'a> CandidatePairs<'a> {
    pub fn new(source: &'a BlockIndex, target: &'a BlockIndex) -> Self {
        CandidatePairs { source, target }
    }

    /// Every generated pair, once per shared key. Duplicates from multi-key
    /// overlap are preserved here for the statistics; scoring runs on
    /// `distinct` instead.
    pub fn pairwise(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let (source, target) = (self.source, self.target);
        source
            .iter()
            .filter_map(move |(key, source_ids)| {
                target.get(key).map(|target_ids| (source_ids, target_ids))
            })
            .flat_map(|(source_ids, target_ids)| {
                source_ids.iter().flat_map(move |source_id| {
                    target_ids
                        .iter()
                        .map(move |target_id| (source_id.as_str(), target_id.as_str()))
                })
            })
    }

    /// The deduplicated pair set in sorted order, the unit of scoring work.
    pub fn distinct(&self) -> Vec<(&'a str, &'a str)> {
        let pairs: BTreeSet<(&str, &str)> = self.pairwise().collect();
        pairs.into_iter().collect()
    }

    pub fn stats(&self, source_len: usize, target_len: usize) -> BlockingStats {
        let mut total = 0usize;
        let mut distinct: BTreeSet<(&str, &str)> = BTreeSet::new();
        for pair in self.pairwise() {
            total += 1;
            distinct.insert(pair);
        }
        let distinct = distinct.len();
        let cross = (source_len * target_len) as f64;
        BlockingStats {
            total_pairs: total,
            distinct_pairs: distinct,
            selectivity: if cross == 0.0 {
                0.0
            } else {
                distinct as f64 / cross
            },
            duplicate_ratio: if distinct == 0 {
                0.0
            } else {
                total as f64 / distinct as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{blocking_keys, BlockIndex};
    use crate::dataset::Dataset;
    use crate::dto::{BlockingParams, RecordSchema};

    fn schema() -> RecordSchema {
        RecordSchema {
            id_field: "uri".to_string(),
            name_field: "name".to_string(),
            birth_year_field: None,
        }
    }

    fn dataset(name: &str, lines: &str) -> Dataset {
        Dataset::from_json_lines(name, lines.as_bytes(), &schema()).unwrap()
    }

    #[test]
    fn pairs_are_exactly_those_sharing_a_key() {
        let source = dataset(
            "autry",
            concat!(
                "{\"uri\": \"a1\", \"name\": \"Jean Smith\"}\n",
                "{\"uri\": \"a2\", \"name\": \"Pablo Ruiz\"}\n",
            ),
        );
        let target = dataset(
            "ulan",
            concat!(
                "{\"uri\": \"u1\", \"name\": \"Joan Smythe\"}\n",
                "{\"uri\": \"u2\", \"name\": \"Maria Lopez\"}\n",
            ),
        );
        let params = BlockingParams::default();
        let source_index = BlockIndex::build(&source, &params);
        let target_index = BlockIndex::build(&target, &params);
        let pairs = CandidatePairs::new(&source_index, &target_index);

        let generated = pairs.distinct();
        let mut expected = Vec::new();
        for a in source.iter() {
            let keys_a = blocking_keys(a, &params);
            for b in target.iter() {
                let keys_b = blocking_keys(b, &params);
                if keys_a.iter().any(|k| keys_b.contains(k)) {
                    expected.push((a.id.as_str(), b.id.as_str()));
                }
            }
        }
        expected.sort();
        assert_eq!(generated, expected);
        // only the smith/smythe pair shares a key here
        assert_eq!(generated, vec![("a1", "u1")]);
    }

    #[test]
    fn multi_key_overlap_is_counted_once_per_key() {
        // both names qualify under "je" and "sm", so the pair appears twice
        let source = dataset("autry", "{\"uri\": \"a1\", \"name\": \"Jean Smith\"}\n");
        let target = dataset("ulan", "{\"uri\": \"u1\", \"name\": \"Jean Smythe\"}\n");
        let params = BlockingParams::default();
        let source_index = BlockIndex::build(&source, &params);
        let target_index = BlockIndex::build(&target, &params);
        let pairs = CandidatePairs::new(&source_index, &target_index);

        let stats = pairs.stats(source.len(), target.len());
        assert_eq!(stats.total_pairs, 2);
        assert_eq!(stats.distinct_pairs, 1);
        assert_eq!(stats.duplicate_ratio, 2.0);
        assert_eq!(stats.selectivity, 1.0);
    }

    #[test]
    fn enumeration_is_restartable_and_identical() {
        let source = dataset(
            "autry",
            concat!(
                "{\"uri\": \"a1\", \"name\": \"Jean Smith\"}\n",
                "{\"uri\": \"a2\", \"name\": \"Joan Smythe\"}\n",
            ),
        );
        let target = dataset("ulan", "{\"uri\": \"u1\", \"name\": \"Jean Smart\"}\n");
        let params = BlockingParams::default();
        let source_index = BlockIndex::build(&source, &params);
        let target_index = BlockIndex::build(&target, &params);
        let pairs = CandidatePairs::new(&source_index, &target_index);

        let first: Vec<_> = pairs.pairwise().collect();
        let second: Vec<_> = pairs.pairwise().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn selectivity_shrinks_when_keys_do_not_overlap() {
        let source = dataset(
            "autry",
            concat!(
                "{\"uri\": \"a1\", \"name\": \"Jean Smith\"}\n",
                "{\"uri\": \"a2\", \"name\": \"Pablo Ruiz\"}\n",
            ),
        );
        let target = dataset(
            "ulan",
            concat!(
                "{\"uri\": \"u1\", \"name\": \"Jean Smith\"}\n",
                "{\"uri\": \"u2\", \"name\": \"Maria Lopez\"}\n",
            ),
        );
        let params = BlockingParams::default();
        let source_index = BlockIndex::build(&source, &params);
        let target_index = BlockIndex::build(&target, &params);
        let pairs = CandidatePairs::new(&source_index, &target_index);

        let stats = pairs.stats(source.len(), target.len());
        assert!(stats.selectivity < 1.0);
    }
}
