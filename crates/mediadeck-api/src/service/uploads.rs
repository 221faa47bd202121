// File upload endpoint.

use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::client::ApiClient;
use crate::envelope::ApiResult;
use crate::error::Error;
use crate::models::{UploadRequest, UploadResult};

impl ApiClient {
    /// Upload one file as `multipart/form-data`.
    ///
    /// `POST /api/uploads` with parts `file` and optional `destination`.
    pub async fn upload_file(&self, upload: UploadRequest) -> Result<ApiResult<UploadResult>, Error> {
        debug!(file = %upload.file_name, bytes = upload.bytes.len(), "uploading file");
        let form = upload_form(upload)?;
        self.post_multipart("uploads", form).await
    }
}

fn upload_form(upload: UploadRequest) -> Result<Form, Error> {
    let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
    if let Some(content_type) = upload.content_type {
        part = part
            .mime_str(&content_type)
            .map_err(|e| Error::Encode(format!("invalid content type {content_type:?}: {e}")))?;
    }

    let mut form = Form::new().part("file", part);
    if let Some(destination) = upload.destination {
        form = form.text("destination", destination);
    }
    Ok(form)
}
