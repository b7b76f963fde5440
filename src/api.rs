use std::path::Path;

use anyhow::Result;
use log::debug;
use reqwest::{
    Client, Method, RequestBuilder, Url,
    header::{ACCEPT, CONTENT_TYPE},
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;

use crate::{
    error::{PublishError, Stage},
    model::{
        CommitRequest, CommitResponse, DistributeRequest, ReleaseHandle, UploadSlotResponse,
        UploadTarget,
    },
    util::{api_endpoint, api_url, display_body, upload_file_name},
};

pub const DEFAULT_API_URL: &str = "https://api.mobile.azure.com/";
const TOKEN_HEADER: &str = "X-API-Token";

pub struct MobileCenterClient {
    http: Client,
    base_url: Url,
    api_token: String,
}

impl MobileCenterClient {
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("mcupload/", env!("CARGO_PKG_VERSION")))
            .use_rustls_tls()
            .build()?;
        let base_url = Url::parse(DEFAULT_API_URL)?;
        Ok(Self {
            http,
            base_url,
            api_token: api_token.into(),
        })
    }

    /// Overrides the API host. Useful for tests with a mock server.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    fn resolve(&self, stage: Stage, path_or_url: &str) -> Result<Url, PublishError> {
        api_url(&self.base_url, path_or_url).map_err(|source| PublishError::InvalidUrl {
            stage,
            url: path_or_url.to_string(),
            source,
        })
    }

    fn endpoint(&self, stage: Stage, segments: &[&str]) -> Result<Url, PublishError> {
        api_endpoint(&self.base_url, segments).map_err(|source| PublishError::InvalidUrl {
            stage,
            url: segments.join("/"),
            source,
        })
    }

    fn json_request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.http
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(TOKEN_HEADER, &self.api_token)
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn send(&self, stage: Stage, req: RequestBuilder) -> Result<String, PublishError> {
        let res = req
            .send()
            .await
            .map_err(|source| PublishError::Transport { stage, source })?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|source| PublishError::Transport { stage, source })?;
        debug!("{} response {}: {}", stage, status, text);
        if !status.is_success() {
            return Err(PublishError::Status {
                stage,
                status,
                body: display_body(&text),
            });
        }
        Ok(text)
    }

    fn decode<T: DeserializeOwned>(stage: Stage, text: &str) -> Result<T, PublishError> {
        serde_json::from_str(text).map_err(|source| PublishError::Decode { stage, source })
    }

    pub async fn request_upload(
        &self,
        user_name: &str,
        application_name: &str,
    ) -> Result<UploadTarget, PublishError> {
        let stage = Stage::RequestUpload;
        let url = self.endpoint(
            stage,
            &["v0.1", "apps", user_name, application_name, "release_uploads"],
        )?;
        let req = self.json_request(Method::POST, url).body("");
        let text = self.send(stage, req).await?;
        Self::decode::<UploadSlotResponse>(stage, &text)?.into_target()
    }

    pub async fn upload_file(&self, path: &Path, target: &UploadTarget) -> Result<(), PublishError> {
        let stage = Stage::UploadFile;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| PublishError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = upload_file_name(path);
        debug!("uploading {} ({} bytes)", file_name, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(|source| PublishError::Transport { stage, source })?;
        let form = Form::new().part("ipa", part);

        let url = self.resolve(stage, &target.upload_url)?;
        debug!("POST {}", url);
        let req = self.http.post(url).multipart(form);
        self.send(stage, req).await?;
        Ok(())
    }

    pub async fn commit_upload(
        &self,
        user_name: &str,
        application_name: &str,
        target: &UploadTarget,
    ) -> Result<ReleaseHandle, PublishError> {
        let stage = Stage::CommitUpload;
        let url = self.endpoint(
            stage,
            &[
                "v0.1",
                "apps",
                user_name,
                application_name,
                "release_uploads",
                &target.upload_id,
            ],
        )?;
        let req = self
            .json_request(Method::PATCH, url)
            .json(&CommitRequest::committed());
        let text = self.send(stage, req).await?;
        Self::decode::<CommitResponse>(stage, &text)?.into_handle()
    }

    pub async fn distribute_release(
        &self,
        distribution_group: &str,
        release_notes: &str,
        release: &ReleaseHandle,
    ) -> Result<(), PublishError> {
        let stage = Stage::Distribute;
        if !release.is_resolved() {
            return Err(PublishError::UnresolvedRelease);
        }
        let url = self.resolve(stage, &release.release_url)?;
        let req = self
            .json_request(Method::PATCH, url)
            .json(&DistributeRequest {
                destination_name: distribution_group,
                release_notes,
            });
        self.send(stage, req).await?;
        Ok(())
    }
}
