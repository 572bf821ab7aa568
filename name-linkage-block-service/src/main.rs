use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use lazy_static::lazy_static;
use name_linkage_service::block::BlockIndex;
use name_linkage_service::dataset::Dataset;
use name_linkage_service::dto::BlockConfig;
use name_linkage_service::error::ServiceError;
use name_linkage_service::response::make_response_payload;
use name_linkage_service::store::{self, ObjectStore};
use rusoto_core::Region;
use serde_json::{json, Value};

lazy_static! {
    // AWS Region
    static ref REGION: Region = store::get_region().unwrap();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    run(service_fn(process)).await?;
    Ok(())
}

async fn process(event: LambdaEvent<BlockConfig>) -> Result<Value, Error> {
    let (config, _context) = event.into_parts();
    let result = build_blocks(config).await;
    make_response_payload(result)
}

/// Materializes one dataset and its block index into the store so matching
/// runs against it can load both without re-parsing. Intended for the
/// larger, more static side of a linkage.
async fn build_blocks(config: BlockConfig) -> Result<Value, ServiceError> {
    let start = std::time::Instant::now();
    let object_store = ObjectStore::new(REGION.clone());
    let bytes = object_store
        .get(&config.dataset.data.bucket, &config.dataset.data.key)
        .await?;
    println!(
        "File downloaded in {:.4} secs",
        (std::time::Instant::now() - start).as_secs_f64()
    );
    let start = std::time::Instant::now();
    let dataset = Dataset::from_json_lines(&config.dataset.name, &bytes, &config.dataset.schema)?;
    println!(
        "Parsed {} records ({} lines skipped) in {:.4} secs",
        dataset.len(),
        dataset.skipped(),
        (std::time::Instant::now() - start).as_secs_f64()
    );
    let index = BlockIndex::build(&dataset, &config.blocking);
    println!(
        "Indexed {} blocking keys in {:.4} secs",
        index.num_keys(),
        (std::time::Instant::now() - start).as_secs_f64()
    );
    object_store
        .put_json(
            &config.store_bucket,
            &store::records_key(&config.dataset.name),
            &dataset.records(),
        )
        .await?;
    object_store
        .put_json(
            &config.store_bucket,
            &store::blocks_key(&config.dataset.name),
            &index,
        )
        .await?;
    Ok(json!({
        "dataset": config.dataset.name,
        "storeBucket": config.store_bucket,
        "records": dataset.len(),
        "skippedLines": dataset.skipped(),
        "blockingKeys": index.num_keys(),
    }))
}
