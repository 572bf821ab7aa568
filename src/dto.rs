use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DataFile {
    pub bucket: String,
    pub key: String,
}

/// Where each record's fields live in a line of the raw file. Different
/// exports use different field names, and the birth-year field may be
/// missing entirely.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSchema {
    pub id_field: String,
    pub name_field: String,
    #[serde(default)]
    pub birth_year_field: Option<String>,
}

/// A dataset to be parsed from a raw line-delimited JSON file.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSource {
    /// Dataset identity, also the store key prefix for persisted artifacts.
    pub name: String,
    pub data: DataFile,
    pub schema: RecordSchema,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockingParams {
    /// Tokens shorter than this contribute no blocking key.
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
    /// Number of leading characters a qualifying token contributes.
    #[serde(default = "default_prefix_len")]
    pub prefix_len: usize,
}

impl Default for BlockingParams {
    fn default() -> Self {
        BlockingParams {
            min_token_len: default_min_token_len(),
            prefix_len: default_prefix_len(),
        }
    }
}

/// Event payload for the block service: materialize one dataset and its
/// block index into the store.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    pub dataset: DatasetSource,
    pub store_bucket: String,
    #[serde(default)]
    pub blocking: BlockingParams,
}

/// The target side of a matching run: either parsed from a raw file like
/// the source, or loaded from the store the block service populated.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum TargetSource {
    Raw {
        name: String,
        data: DataFile,
        schema: RecordSchema,
    },
    Precomputed {
        name: String,
        store_bucket: String,
    },
}

/// Event payload for the match service.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    pub source: DatasetSource,
    pub target: TargetSource,
    /// Where the CSV report lands.
    pub report: DataFile,
    /// Token-pair similarity cutoff inside the scorer.
    #[serde(default = "default_threshold")]
    pub inner_threshold: f64,
    /// Minimum accepted overall score.
    #[serde(default = "default_threshold")]
    pub match_threshold: f64,
    #[serde(default)]
    pub blocking: BlockingParams,
}

fn default_min_token_len() -> usize {
    3
}

fn default_prefix_len() -> usize {
    2
}

fn default_threshold() -> f64 {
    0.67
}
