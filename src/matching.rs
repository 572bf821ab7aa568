use crate::candidates::CandidatePairs;
use crate::dataset::Dataset;
use crate::error::ServiceError;
use crate::score::score_pair;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Best accepted target per source id. An entry exists only for scores
/// strictly above the threshold and is replaced only by a strictly greater
/// score, so the final table is independent of the order pairs arrive in.
#[derive(Clone, Debug)]
pub struct MatchTable {
    threshold: f64,
    entries: FxHashMap<String, (f64, String)>,
}

impl MatchTable {
    pub fn new(threshold: f64) -> Self {
        MatchTable {
            threshold,
            entries: FxHashMap::default(),
        }
    }

    /// The selector's single transition: Unmatched -> Matched on the first
    /// accepted score, then strictly-greater-wins.
    pub fn consider(&mut self, source_id: &str, score: f64, target_id: &str) {
        if score <= self.threshold {
            return;
        }
        match self.entries.get_mut(source_id) {
            Some(entry) if entry.0 >= score => {}
            Some(entry) => *entry = (score, target_id.to_owned()),
            None => {
                self.entries
                    .insert(source_id.to_owned(), (score, target_id.to_owned()));
            }
        }
    }

    /// Reducer for sharded scoring: re-applies the strictly-greater rule
    /// entry by entry, so where the shard boundaries fell cannot matter.
    pub fn merge(mut self, other: MatchTable) -> MatchTable {
        for (source_id, (score, target_id)) in other.entries {
            match self.entries.get_mut(&source_id) {
                Some(entry) if entry.0 >= score => {}
                Some(entry) => *entry = (score, target_id),
                None => {
                    self.entries.insert(source_id, (score, target_id));
                }
            }
        }
        self
    }

    pub fn get(&self, source_id: &str) -> Option<(f64, &str)> {
        self.entries
            .get(source_id)
            .map(|(score, target_id)| (*score, target_id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows sorted by source id, for reporting.
    pub fn into_rows(self) -> Vec<(String, f64, String)> {
        let mut rows: Vec<(String, f64, String)> = self
            .entries
            .into_iter()
            .map(|(source_id, (score, target_id))| (source_id, score, target_id))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }
}

/// Scores every distinct candidate pair and folds the results into a match
/// table. The scorer is a pure function of two immutable records, so the
/// work is sharded across the rayon pool; fold builds one table per shard
/// and merge is the single reducer. An id found in an index but not in its
/// dataset means the index is stale, which aborts the run.
pub fn run_matching(
    pairs: &CandidatePairs,
    source: &Dataset,
    target: &Dataset,
    inner_threshold: f64,
    match_threshold: f64,
) -> Result<MatchTable, ServiceError> {
    let distinct = pairs.distinct();
    distinct
        .par_iter()
        .try_fold(
            || MatchTable::new(match_threshold),
            |mut table, &(source_id, target_id)| {
                let record_a = source
                    .get(source_id)
                    .ok_or_else(|| ServiceError::block_index_inconsistency(source.name(), source_id))?;
                let record_b = target
                    .get(target_id)
                    .ok_or_else(|| ServiceError::block_index_inconsistency(target.name(), target_id))?;
                table.consider(source_id, score_pair(record_a, record_b, inner_threshold), target_id);
                Ok(table)
            },
        )
        .try_reduce(|| MatchTable::new(match_threshold), |a, b| Ok(a.merge(b)))
}
