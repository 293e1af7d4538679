//! Admin CSV upload: ask the backend for a pre-signed URL, then PUT the file
//! bytes straight to it.

use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::{Body, Client};
use serde::Deserialize;
use serde_json::json;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

/// Any of the three field names the backend may use for the URL.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresignResponse {
    upload_url: Option<String>,
    url: Option<String>,
    presigned_url: Option<String>,
}

impl PresignResponse {
    fn into_url(self) -> Option<String> {
        self.upload_url
            .or(self.url)
            .or(self.presigned_url)
            .filter(|u| !u.is_empty())
    }
}

/// Wraps a reader and reports whole-percent progress as bytes are pulled.
struct ProgressReader<R, F> {
    inner: R,
    total: u64,
    read: u64,
    last_percent: Option<u8>,
    on_progress: F,
}

impl<R: Read, F: FnMut(u8)> ProgressReader<R, F> {
    fn new(inner: R, total: u64, on_progress: F) -> Self {
        Self {
            inner,
            total,
            read: 0,
            last_percent: None,
            on_progress,
        }
    }

    fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.read as f64 / self.total as f64) * 100.0).round().min(100.0) as u8
    }
}

impl<R: Read, F: FnMut(u8)> Read for ProgressReader<R, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.read += n as u64;
        let percent = self.percent();
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            (self.on_progress)(percent);
        }
        Ok(n)
    }
}

pub fn ensure_csv(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Not a file path: {:?}", path))?;
    if !name.to_lowercase().ends_with(".csv") {
        bail!("Please select a .csv file.");
    }
    Ok(name.to_string())
}

/// Requests a pre-signed upload URL for `filename`.
pub fn request_upload_url(client: &Client, endpoint: &str, filename: &str) -> Result<String> {
    let response = client
        .post(endpoint)
        .json(&json!({ "filename": filename }))
        .send()
        .with_context(|| format!("Failed to reach upload endpoint {}", endpoint))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().unwrap_or_default();
        if text.is_empty() {
            bail!("Failed to get upload URL: {}", status.as_u16());
        }
        bail!(text);
    }

    let body: PresignResponse = response
        .json()
        .context("Invalid response from upload endpoint")?;
    body.into_url().ok_or_else(|| {
        anyhow!("Invalid response: missing upload URL (expected uploadUrl, url, or presignedUrl)")
    })
}

/// PUTs the file at `path` to `url`, calling `on_progress` with 0-100 as the
/// body is streamed. Any 2xx status is success.
pub fn put_file<F>(client: &Client, url: &str, path: &Path, on_progress: F) -> Result<u64>
where
    F: FnMut(u8) + Send + 'static,
{
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let total = file
        .metadata()
        .with_context(|| format!("Failed to stat {:?}", path))?
        .len();
    let body = Body::sized(ProgressReader::new(file, total, on_progress), total);

    let response = client
        .put(url)
        .header(reqwest::header::CONTENT_TYPE, "text/csv")
        .body(body)
        .send()
        .context("Network error during upload")?;

    let status = response.status();
    if !status.is_success() {
        bail!(
            "Upload failed: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
    }
    debug!(status = status.as_u16(), bytes = total, "upload accepted");
    Ok(total)
}

/// The whole admin flow for one file.
pub fn upload_csv<F>(endpoint: &str, path: &Path, on_progress: F) -> Result<u64>
where
    F: FnMut(u8) + Send + 'static,
{
    let filename = ensure_csv(path)?;
    let client = Client::new();

    info!(file = %filename, endpoint, "requesting upload URL");
    let url = request_upload_url(&client, endpoint, &filename)?;

    info!(file = %filename, "uploading");
    put_file(&client, &url, path, on_progress)
}
