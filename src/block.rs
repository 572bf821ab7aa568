use crate::dataset::Dataset;
use crate::dto::BlockingParams;
use crate::error::ServiceError;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Blocking keys for one record: the prefix of every name token long enough
/// to qualify. Short tokens contribute nothing, so a record whose tokens
/// are all short yields no keys and is never proposed as a candidate.
pub fn blocking_keys(record: &Record, params: &BlockingParams) -> Vec<String> {
    record
        .name_tokens
        .iter()
        .filter(|token| token.chars().count() >= params.min_token_len)
        .map(|token| token.chars().take(params.prefix_len).collect())
        .collect()
}

/// Mapping from blocking key to the set of record ids sharing it. Sorted
/// containers keep candidate enumeration deterministic across runs and
/// across store reloads.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct BlockIndex {
    blocks: BTreeMap<String, BTreeSet<String>>,
}

impl BlockIndex {
    /// One pass over the dataset; re-adding an id under a key it already
    /// occupies is a no-op.
    pub fn build(dataset: &Dataset, params: &BlockingParams) -> BlockIndex {
        let mut blocks: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for record in dataset.iter() {
            for key in blocking_keys(record, params) {
                blocks.entry(key).or_default().insert(record.id.clone());
            }
        }
        BlockIndex { blocks }
    }

    pub fn get(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.blocks.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.blocks.iter().map(|(key, ids)| (key.as_str(), ids))
    }

    pub fn num_keys(&self) -> usize {
        self.blocks.len()
    }

    /// A persisted index may only reference ids present in the dataset it
    /// was built from; anything else means the stored index is stale and
    /// the run must not continue with it.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), ServiceError> {
        for ids in self.blocks.values() {
            for id in ids {
                if dataset.get(id).is_none() {
                    return Err(ServiceError::block_index_inconsistency(dataset.name(), id));
                }
            }
        }
        Ok(())
    }
}
