use crate::response::Status;
use serde::Serialize;
use serde_json;
use std::error;
use std::fmt;

/// What went wrong, independent of the HTTP-ish status it maps to. Decode
/// failures are recovered per line by the dataset reader; the structural
/// kinds abort the run.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    SourceFormat,
    IdentityCollision,
    BlockIndexInconsistency,
    BadRequest,
    Internal,
}

#[derive(Debug, Serialize, Clone)]
pub struct ServiceError {
    pub msg: String,
    pub kind: ErrorKind,
    pub status: Status,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = serde_json::to_string_pretty(&self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}

impl error::Error for ServiceError {}

impl ServiceError {
    pub fn bad_request<T: std::fmt::Display>(msg: T) -> ServiceError {
        ServiceError {
            msg: msg.to_string(),
            kind: ErrorKind::BadRequest,
            status: Status::BadRequest,
        }
    }

    pub fn internal_server_error<T: std::fmt::Display>(msg: T) -> ServiceError {
        ServiceError {
            msg: msg.to_string(),
            kind: ErrorKind::Internal,
            status: Status::InternalServerError,
        }
    }

    pub fn source_format<T: std::fmt::Display>(msg: T) -> ServiceError {
        ServiceError {
            msg: msg.to_string(),
            kind: ErrorKind::SourceFormat,
            status: Status::BadRequest,
        }
    }

    pub fn identity_collision(dataset: &str, id: &str) -> ServiceError {
        ServiceError {
            msg: format!("dataset '{}' contains id '{}' more than once", dataset, id),
            kind: ErrorKind::IdentityCollision,
            status: Status::BadRequest,
        }
    }

    pub fn block_index_inconsistency(dataset: &str, id: &str) -> ServiceError {
        ServiceError {
            msg: format!(
                "block index for dataset '{}' references unknown id '{}'; \
                 the persisted index is stale and must be rebuilt",
                dataset, id
            ),
            kind: ErrorKind::BlockIndexInconsistency,
            status: Status::InternalServerError,
        }
    }
}
