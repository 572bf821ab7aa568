use crate::error::ServiceError;
use futures::stream::TryStreamExt;
use rusoto_core::{Client, Region};
use rusoto_s3::{GetObjectRequest, PutObjectRequest, S3Client, S3};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::str::FromStr;

pub fn get_region() -> Result<Region, ServiceError> {
    match env::var("REGION") {
        Ok(val) => Region::from_str(val.as_str())
            .map_err(|_| ServiceError::internal_server_error(format!("Unable to parse region {}", val))),
        _ => Err(ServiceError::internal_server_error(
            "Environment variable 'REGION' not found",
        )),
    }
}

/// Handle to the object namespace holding raw data files and the persisted
/// datasets and block indexes. Constructed by the caller and passed down;
/// nothing else in the pipeline reaches for ambient connection state.
pub struct ObjectStore {
    client: S3Client,
}

impl ObjectStore {
    pub fn new(region: Region) -> Self {
        ObjectStore {
            client: S3Client::new_with_client(Client::shared(), region),
        }
    }

    pub async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ServiceError> {
        let request = GetObjectRequest {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            ..Default::default()
        };
        let mut object = self
            .client
            .get_object(request)
            .await
            .map_err(ServiceError::internal_server_error)?;
        let body = object
            .body
            .take()
            .ok_or(ServiceError::internal_server_error(
                "Unable to extract body",
            ))?;
        body.map_ok(|b| b.to_vec())
            .try_concat()
            .await
            .map_err(ServiceError::internal_server_error)
    }

    pub async fn put(&self, bucket: &str, key: &str, object: Vec<u8>) -> Result<(), ServiceError> {
        let request = PutObjectRequest {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            body: Some(object.into()),
            ..Default::default()
        };
        self.client
            .put_object(request)
            .await
            .map(|_| ())
            .map_err(ServiceError::internal_server_error)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<T, ServiceError> {
        let bytes = self.get(bucket, key).await?;
        serde_json::from_slice(&bytes).map_err(ServiceError::internal_server_error)
    }

    pub async fn put_json<T: Serialize>(
        &self,
        bucket: &str,
        key: &str,
        value: &T,
    ) -> Result<(), ServiceError> {
        let bytes = serde_json::to_vec(value).map_err(ServiceError::internal_server_error)?;
        self.put(bucket, key, bytes).await
    }
}

/// Store key for a dataset's materialized records.
pub fn records_key(dataset: &str) -> String {
    format!("{}/records.json", dataset)
}

/// Store key for a dataset's persisted block index.
pub fn blocks_key(dataset: &str) -> String {
    format!("{}/blocks.json", dataset)
}
