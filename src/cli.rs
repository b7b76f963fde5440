use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    api::{DEFAULT_API_URL, MobileCenterClient},
    error::{PublishError, Stage},
    model::{DEFAULT_RELEASE_NOTES, RunParameters},
    publish::{PublishState, Publisher, StepObserver},
    util::normalize_base_url,
};

#[derive(Parser, Debug)]
#[command(
    name = "mcupload",
    version,
    about = "Upload an app build to Mobile Center and release it to a distribution group",
    long_about = None
)]
pub struct Cli {
    /// Application name
    #[arg(short = 'A', long = "app", allow_hyphen_values = true)]
    pub app: Option<String>,

    /// API token
    #[arg(
        short = 'T',
        long = "token",
        env = "MOBILE_CENTER_API_TOKEN",
        hide_env_values = true,
        allow_hyphen_values = true
    )]
    pub token: Option<String>,

    /// Path of the binary to upload
    #[arg(short = 'L', long = "file", allow_hyphen_values = true)]
    pub file: Option<PathBuf>,

    /// Owner (user or organization) name
    #[arg(short = 'U', long = "user", allow_hyphen_values = true)]
    pub user: Option<String>,

    /// Distribution group to release to
    #[arg(short = 'D', long = "group", allow_hyphen_values = true)]
    pub group: Option<String>,

    /// Release notes (also accepted as -RN)
    #[arg(
        long = "release-notes",
        default_value = DEFAULT_RELEASE_NOTES,
        allow_hyphen_values = true
    )]
    pub release_notes: String,

    /// API base URL
    #[arg(long = "api-url", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses the process arguments, accepting the legacy `-RN` flag.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn into_params(self) -> Result<RunParameters, PublishError> {
        let application_name = require(self.app, "-A", "application name")?;
        let api_token = require(self.token, "-T", "API token")?;
        let file_location = self
            .file
            .filter(|f| !f.as_os_str().is_empty())
            .ok_or(PublishError::MissingArgument {
                flag: "-L",
                name: "file location",
            })?;
        let user_name = require(self.user, "-U", "user name")?;
        let distribution_group = require(self.group, "-D", "distribution group")?;
        Ok(RunParameters {
            application_name,
            user_name,
            file_location,
            api_token,
            distribution_group,
            release_notes: self.release_notes,
        })
    }
}

fn require(
    value: Option<String>,
    flag: &'static str,
    name: &'static str,
) -> Result<String, PublishError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(PublishError::MissingArgument { flag, name })
}

/// Rewrites `-RN` and `-RN=...` to `--release-notes`; clap only takes single-letter shorts.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|a| {
            if a == "-RN" {
                return OsString::from("--release-notes");
            }
            match a.to_str().and_then(|s| s.strip_prefix("-RN=")) {
                Some(notes) => OsString::from(format!("--release-notes={}", notes)),
                None => a,
            }
        })
        .collect()
}

pub async fn run_cli(cli: Cli) -> Result<()> {
    let base_url = normalize_base_url(&cli.api_url)
        .with_context(|| format!("invalid --api-url {:?}", cli.api_url))?;
    let params = cli.into_params()?;
    let client = MobileCenterClient::new(params.api_token.clone())?.with_base_url(base_url);

    let mut progress = SpinnerProgress::default();
    let mut publisher = Publisher::new(&client, &params);
    let result = publisher.run_observed(&mut progress).await;
    progress.clear();
    result?;

    println!("All Done");
    Ok(())
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb
}

#[derive(Default)]
struct SpinnerProgress {
    current: Option<ProgressBar>,
}

impl SpinnerProgress {
    fn clear(&mut self) {
        if let Some(pb) = self.current.take() {
            pb.finish_and_clear();
        }
    }
}

impl StepObserver for SpinnerProgress {
    fn step_started(&mut self, stage: Stage) {
        self.clear();
        let msg = match stage {
            Stage::RequestUpload => "Getting upload details...",
            Stage::UploadFile => "Uploading file...",
            Stage::CommitUpload => "Committing upload...",
            Stage::Distribute => "Sending release to distribution group...",
        };
        self.current = Some(spinner(msg));
    }

    fn step_finished(&mut self, state: &PublishState) {
        self.clear();
        match state {
            PublishState::UploadRequested(target) => {
                println!("Upload slot: {}", target.upload_id)
            }
            PublishState::FileUploaded(_) => println!("File uploaded"),
            PublishState::Finalized(release) => {
                println!("Release {}: {}", release.release_id, release.release_url)
            }
            PublishState::Distributed(_) => println!("Release distributed"),
            PublishState::Start | PublishState::Failed { .. } => {}
        }
    }
}
