use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{PublishError, Stage};

pub const DEFAULT_RELEASE_NOTES: &str = "This is a release";

/// Everything one publish run needs, validated once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParameters {
    pub application_name: String,
    pub user_name: String,
    pub file_location: PathBuf,
    pub api_token: String,
    pub distribution_group: String,
    pub release_notes: String,
}

/// Server-issued slot for a single binary upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub upload_url: String,
    pub upload_id: String,
}

/// Release created by committing an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseHandle {
    pub release_id: i64,
    pub release_url: String,
}

impl ReleaseHandle {
    /// Placeholder for "the upload was never committed".
    pub fn unresolved() -> Self {
        Self {
            release_id: -1,
            release_url: String::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.release_id >= 0 && !self.release_url.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadSlotResponse {
    pub upload_url: Option<String>,
    pub upload_id: Option<String>,
}

impl UploadSlotResponse {
    pub fn into_target(self) -> Result<UploadTarget, PublishError> {
        let stage = Stage::RequestUpload;
        Ok(UploadTarget {
            upload_url: required(self.upload_url, stage, "upload_url")?,
            upload_id: required(self.upload_id, stage, "upload_id")?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CommitRequest<'a> {
    pub status: &'a str,
}

impl CommitRequest<'static> {
    pub fn committed() -> Self {
        Self {
            status: "committed",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommitResponse {
    pub release_id: Option<i64>,
    pub release_url: Option<String>,
}

impl CommitResponse {
    pub fn into_handle(self) -> Result<ReleaseHandle, PublishError> {
        let stage = Stage::CommitUpload;
        let release_id = self.release_id.ok_or(PublishError::MissingField {
            stage,
            field: "release_id",
        })?;
        Ok(ReleaseHandle {
            release_id,
            release_url: required(self.release_url, stage, "release_url")?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DistributeRequest<'a> {
    pub destination_name: &'a str,
    pub release_notes: &'a str,
}

fn required(
    value: Option<String>,
    stage: Stage,
    field: &'static str,
) -> Result<String, PublishError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PublishError::MissingField { stage, field }),
    }
}
