use log::info;

use crate::{
    api::MobileCenterClient,
    error::{PublishError, Stage},
    model::{ReleaseHandle, RunParameters, UploadTarget},
};

/// Where a run currently stands. `Failed` ends the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishState {
    Start,
    UploadRequested(UploadTarget),
    FileUploaded(UploadTarget),
    Finalized(ReleaseHandle),
    Distributed(ReleaseHandle),
    Failed { stage: Stage },
}

/// Callbacks invoked around each step, used by the CLI for progress output.
pub trait StepObserver {
    fn step_started(&mut self, _stage: Stage) {}
    fn step_finished(&mut self, _state: &PublishState) {}
}

impl StepObserver for () {}

pub struct Publisher<'a> {
    client: &'a MobileCenterClient,
    params: &'a RunParameters,
    state: PublishState,
    release: ReleaseHandle,
}

impl<'a> Publisher<'a> {
    pub fn new(client: &'a MobileCenterClient, params: &'a RunParameters) -> Self {
        Self {
            client,
            params,
            state: PublishState::Start,
            release: ReleaseHandle::unresolved(),
        }
    }

    pub fn state(&self) -> &PublishState {
        &self.state
    }

    /// Last release produced by the commit step, or the unresolved sentinel.
    pub fn release(&self) -> &ReleaseHandle {
        &self.release
    }

    pub async fn run(&mut self) -> Result<ReleaseHandle, PublishError> {
        self.run_observed(&mut ()).await
    }

    /// Runs the four steps in order, stopping at the first failure.
    ///
    /// Each call starts over from the upload request.
    pub async fn run_observed(
        &mut self,
        observer: &mut dyn StepObserver,
    ) -> Result<ReleaseHandle, PublishError> {
        let client = self.client;
        let p = self.params;
        self.state = PublishState::Start;
        self.release = ReleaseHandle::unresolved();

        observer.step_started(Stage::RequestUpload);
        let target = client
            .request_upload(&p.user_name, &p.application_name)
            .await
            .map_err(|e| self.fail(Stage::RequestUpload, e))?;
        info!("upload slot {} issued", target.upload_id);
        self.state = PublishState::UploadRequested(target.clone());
        observer.step_finished(&self.state);

        observer.step_started(Stage::UploadFile);
        client
            .upload_file(&p.file_location, &target)
            .await
            .map_err(|e| self.fail(Stage::UploadFile, e))?;
        info!("uploaded {}", p.file_location.display());
        self.state = PublishState::FileUploaded(target.clone());
        observer.step_finished(&self.state);

        observer.step_started(Stage::CommitUpload);
        let release = client
            .commit_upload(&p.user_name, &p.application_name, &target)
            .await
            .map_err(|e| self.fail(Stage::CommitUpload, e))?;
        info!("release {} committed", release.release_id);
        self.release = release.clone();
        self.state = PublishState::Finalized(release.clone());
        observer.step_finished(&self.state);

        observer.step_started(Stage::Distribute);
        client
            .distribute_release(&p.distribution_group, &p.release_notes, &release)
            .await
            .map_err(|e| self.fail(Stage::Distribute, e))?;
        info!(
            "release {} sent to group {}",
            release.release_id, p.distribution_group
        );
        self.state = PublishState::Distributed(release.clone());
        observer.step_finished(&self.state);

        Ok(release)
    }

    fn fail(&mut self, stage: Stage, err: PublishError) -> PublishError {
        self.state = PublishState::Failed { stage };
        err
    }
}
