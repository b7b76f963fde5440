use std::fmt;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// The four remote steps of a publish run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RequestUpload,
    UploadFile,
    CommitUpload,
    Distribute,
}

impl Stage {
    pub fn exit_code(self) -> u8 {
        match self {
            Stage::RequestUpload => 3,
            Stage::UploadFile => 4,
            Stage::CommitUpload => 5,
            Stage::Distribute => 6,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::RequestUpload => "upload request",
            Stage::UploadFile => "file upload",
            Stage::CommitUpload => "upload commit",
            Stage::Distribute => "distribution",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("missing required argument {flag} ({name})")]
    MissingArgument {
        flag: &'static str,
        name: &'static str,
    },
    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} request failed: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },
    #[error("{stage} failed {status}: {body}")]
    Status {
        stage: Stage,
        status: StatusCode,
        body: String,
    },
    #[error("{stage} response is not valid JSON: {source}")]
    Decode {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },
    #[error("{stage} response is missing `{field}`")]
    MissingField { stage: Stage, field: &'static str },
    #[error("invalid {stage} URL {url:?}: {source}")]
    InvalidUrl {
        stage: Stage,
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("release was never committed; refusing to distribute")]
    UnresolvedRelease,
}

impl PublishError {
    /// Step the error belongs to, `None` for argument validation.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PublishError::MissingArgument { .. } => None,
            PublishError::ReadFile { .. } => Some(Stage::UploadFile),
            PublishError::UnresolvedRelease => Some(Stage::Distribute),
            PublishError::Transport { stage, .. }
            | PublishError::Status { stage, .. }
            | PublishError::Decode { stage, .. }
            | PublishError::MissingField { stage, .. }
            | PublishError::InvalidUrl { stage, .. } => Some(*stage),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.stage().map(Stage::exit_code).unwrap_or(2)
    }
}
