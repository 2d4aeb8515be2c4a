// OneSky API client: a small blocking HTTP client around the two platform
// endpoints the sync scripts need, file upload and translation download.
// Each call signs itself with a fresh timestamp right before it is sent.

use crate::auth::Credentials;
use crate::error::{Result, SyncError};
use reqwest::blocking::{multipart, Client, Response};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;
use tracing::debug;

/// OneSky's name for the iOS `.strings` format.
pub const FILE_FORMAT: &str = "IOS_STRINGS";

/// Blocking client bound to one API base URL.
#[derive(Clone, Debug)]
pub struct OneSkyClient {
    client: Client,
    base_url: String,
}

/// Part of the upload answer we care about. OneSky replies with
/// `{"meta": {...}, "data": {"name": ..., "import": {"id": ...}}}`.
#[derive(Deserialize, Debug)]
struct UploadAnswer {
    data: Option<UploadData>,
}

#[derive(Deserialize, Debug)]
struct UploadData {
    name: Option<String>,
    import: Option<ImportInfo>,
}

#[derive(Deserialize, Debug)]
struct ImportInfo {
    id: serde_json::Value,
}

impl OneSkyClient {
    /// Create a client for `base_url`, e.g. `https://platform.api.onesky.io`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(OneSkyClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn project_url(&self, project_id: &str, endpoint: &str) -> String {
        format!("{}/1/projects/{}/{}", self.base_url, project_id, endpoint)
    }

    /// Upload a string table to `project_id` as multipart/form-data.
    ///
    /// The body is built from in-memory parts so reqwest sends an exact
    /// `Content-Length`. Any non-2xx answer becomes `SyncError::Rejected`
    /// carrying the response body.
    pub fn upload(
        &self,
        credentials: &Credentials,
        project_id: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<()> {
        let url = self.project_url(project_id, "files");
        let signature = credentials.sign();

        let part = multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/plain")?;
        let form = multipart::Form::new()
            .text("api_key", credentials.api_key.clone())
            .text("timestamp", signature.timestamp)
            .text("dev_hash", signature.dev_hash)
            .text("is_keeping_all_strings", "true")
            .text("file_format", FILE_FORMAT)
            .part("file", part);

        debug!("POST {}", url);
        let res = self.client.post(&url).multipart(form).send()?;
        let res = check_status(res)?;

        // The answer is informational only.
        let body = res.bytes()?;
        if let Ok(answer) = serde_json::from_slice::<UploadAnswer>(&body) {
            if let Some(data) = answer.data {
                debug!(
                    file = data.name.as_deref().unwrap_or(file_name),
                    import_id = %data.import.map(|i| i.id).unwrap_or_default(),
                    "Upload accepted"
                );
            }
        }
        Ok(())
    }

    /// Download the `locale` translation of `source_file_name` and store it
    /// at `destination`.
    ///
    /// The body is read completely before anything touches the disk, then
    /// written to a temporary file next to `destination` and renamed over
    /// it, so a failed request never truncates an existing translation.
    /// The parent directory must already exist.
    pub fn download(
        &self,
        credentials: &Credentials,
        project_id: &str,
        source_file_name: &str,
        locale: &str,
        destination: &Path,
    ) -> Result<()> {
        let url = self.project_url(project_id, "translations");
        let signature = credentials.sign();

        debug!("GET {} (locale {})", url, locale);
        let res = self
            .client
            .get(&url)
            .query(&[
                ("api_key", credentials.api_key.as_str()),
                ("timestamp", signature.timestamp.as_str()),
                ("dev_hash", signature.dev_hash.as_str()),
                ("locale", locale),
                ("source_file_name", source_file_name),
            ])
            .send()?;
        let res = check_status(res)?;
        let body = res.bytes()?;

        write_atomically(destination, &body).map_err(|source| SyncError::Write {
            path: destination.to_path_buf(),
            source,
        })?;
        debug!("Wrote {} bytes to {}", body.len(), destination.display());
        Ok(())
    }
}

fn check_status(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().unwrap_or_default();
    Err(SyncError::Rejected { status, body })
}

// An existing translation keeps its mode. A new one gets the same mode
// `File::create` would give it (0o666 minus the umask), not tempfile's 0o600.
fn write_atomically(destination: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let existing = std::fs::metadata(destination).ok().map(|m| m.permissions());

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(contents)?;
    if let Some(permissions) = existing {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(destination).map_err(|e| e.error)?;
    Ok(())
}
