use csv::Writer;
use name_linkage_service::block::BlockIndex;
use name_linkage_service::dataset::Dataset;
use name_linkage_service::dto::{BlockingParams, DataFile, DatasetSource, TargetSource};
use name_linkage_service::error::ServiceError;
use name_linkage_service::matching::MatchTable;
use name_linkage_service::record::Record;
use name_linkage_service::store::{self, ObjectStore};
use serde_json::{json, Value};

pub async fn pull_dataset(
    object_store: &ObjectStore,
    source: &DatasetSource,
) -> Result<Dataset, ServiceError> {
    let bytes = object_store
        .get(&source.data.bucket, &source.data.key)
        .await?;
    Dataset::from_json_lines(&source.name, &bytes, &source.schema)
}

/// Loads the target side together with its block index: parsed and indexed
/// on the fly for a raw file, or read back from the store the block service
/// populated. A stale persisted index fails validation and aborts the run;
/// re-running the block service is the fix.
pub async fn load_target(
    object_store: &ObjectStore,
    target: &TargetSource,
    blocking: &BlockingParams,
) -> Result<(Dataset, BlockIndex), ServiceError> {
    match target {
        TargetSource::Raw { name, data, schema } => {
            let bytes = object_store.get(&data.bucket, &data.key).await?;
            let dataset = Dataset::from_json_lines(name, &bytes, schema)?;
            let index = BlockIndex::build(&dataset, blocking);
            Ok((dataset, index))
        }
        TargetSource::Precomputed { name, store_bucket } => {
            let records: Vec<Record> = object_store
                .get_json(store_bucket, &store::records_key(name))
                .await?;
            let dataset = Dataset::from_records(name, records)?;
            let index: BlockIndex = object_store
                .get_json(store_bucket, &store::blocks_key(name))
                .await?;
            index.validate(&dataset)?;
            Ok((dataset, index))
        }
    }
}

pub async fn push_report(
    object_store: &ObjectStore,
    report: &DataFile,
    table: MatchTable,
) -> Result<Value, ServiceError> {
    let mut writer = Writer::from_writer(vec![]);
    writer
        .write_record(["source_id", "score", "target_id"])
        .map_err(ServiceError::internal_server_error)?;
    for (source_id, score, target_id) in table.into_rows() {
        writer
            .write_record([source_id, format!("{:.4}", score), target_id])
            .map_err(ServiceError::internal_server_error)?;
    }
    let object = writer
        .into_inner()
        .map_err(ServiceError::internal_server_error)?;
    object_store.put(&report.bucket, &report.key, object).await?;
    Ok(json!({ "bucket": report.bucket, "key": report.key }))
}
