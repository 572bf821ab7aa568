mod util;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use lazy_static::lazy_static;
use name_linkage_service::block::BlockIndex;
use name_linkage_service::candidates::CandidatePairs;
use name_linkage_service::dto::MatchConfig;
use name_linkage_service::error::ServiceError;
use name_linkage_service::matching::run_matching;
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

async fn process(event: LambdaEvent<MatchConfig>) -> Result<Value, Error> {
    let (config, _context) = event.into_parts();
    let result = link(config).await;
    make_response_payload(result)
}

async fn link(config: MatchConfig) -> Result<Value, ServiceError> {
    let start = std::time::Instant::now();
    let object_store = ObjectStore::new(REGION.clone());
    let source = util::pull_dataset(&object_store, &config.source).await?;
    let (target, target_index) =
        util::load_target(&object_store, &config.target, &config.blocking).await?;
    println!(
        "Datasets ready ({} source / {} target records, {} source lines skipped) in {:.4} secs",
        source.len(),
        target.len(),
        source.skipped(),
        (std::time::Instant::now() - start).as_secs_f64()
    );

    let start = std::time::Instant::now();
    let source_index = BlockIndex::build(&source, &config.blocking);
    let pairs = CandidatePairs::new(&source_index, &target_index);
    let stats = pairs.stats(source.len(), target.len());
    println!(
        "{} candidate pairs ({} distinct, selectivity {:.6}, duplicate ratio {:.2}) in {:.4} secs",
        stats.total_pairs,
        stats.distinct_pairs,
        stats.selectivity,
        stats.duplicate_ratio,
        (std::time::Instant::now() - start).as_secs_f64()
    );

    let start = std::time::Instant::now();
    let table = run_matching(
        &pairs,
        &source,
        &target,
        config.inner_threshold,
        config.match_threshold,
    )?;
    println!(
        "Scored {} pairs into {} matches in {:.4} secs",
        stats.distinct_pairs,
        table.len(),
        (std::time::Instant::now() - start).as_secs_f64()
    );

    let matches = table.len();
    let match_ratio = if source.is_empty() {
        0.0
    } else {
        matches as f64 / source.len() as f64
    };
    let report = util::push_report(&object_store, &config.report, table).await?;
    Ok(json!({
        "report": report,
        "matches": matches,
        "sourceRecords": source.len(),
        "targetRecords": target.len(),
        "matchRatio": match_ratio,
        "skippedSourceLines": source.skipped(),
        "skippedTargetLines": target.skipped(),
        "blocking": stats,
    }))
}
