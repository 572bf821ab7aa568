//! Approximate entity resolution between two collections of named entities.
//!
//! The pipeline determines, for each record in a source collection, the best
//! matching record in a target collection: name tokens are normalized,
//! records are grouped under short blocking keys, cross-dataset candidate
//! pairs are generated from shared keys, each pair is scored with a hybrid
//! Jaccard measure (with a birth-year hard filter), and a strictly-greater-
//! wins reduction keeps the single best target per source record.
//!
//! The library is shared by the block (precompute) service, which
//! materializes a dataset and its block index into the store, and the match
//! service, which runs the full linkage pass and writes the report.

pub mod block;
pub mod candidates;
pub mod dataset;
pub mod dto;
pub mod error;
pub mod matching;
pub mod normalize;
pub mod record;
pub mod response;
pub mod score;
pub mod store;
