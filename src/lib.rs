pub mod api;
pub mod cli;
pub mod error;
pub mod model;
pub mod publish;
pub mod util;

pub use api::MobileCenterClient;
pub use error::{PublishError, Stage};
pub use model::{ReleaseHandle, RunParameters, UploadTarget};
pub use publish::{PublishState, Publisher};
pub use util::{api_endpoint, api_url, display_body, normalize_base_url, upload_file_name};
