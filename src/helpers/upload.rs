//! Multipart file upload to a generic endpoint.

use super::HelperError;
use reqwest::blocking::Client;
use reqwest::blocking::multipart::Form;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const TIMEOUT: Duration = Duration::from_secs(30);

/// The endpoint's reply: structured when it is JSON, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadResponse {
    Json(serde_json::Value),
    Text(String),
}

impl UploadResponse {
    fn from_body(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body),
        }
    }
}

impl fmt::Display for UploadResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => f.write_str(&pretty),
                Err(_) => write!(f, "{}", value),
            },
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// POST `file_path` as the `file` part of a multipart form, alongside any
/// extra text `fields`. An empty `api_key` is treated as none.
///
/// The form owns the open file and is consumed by the request, so the handle
/// is closed whether or not the request succeeds.
pub fn upload_file(
    endpoint: &str,
    file_path: &Path,
    api_key: Option<&str>,
    fields: &[(String, String)],
) -> Result<UploadResponse, HelperError> {
    if !file_path.exists() {
        return Err(HelperError::MissingPath(file_path.to_path_buf()));
    }

    let form = fields
        .iter()
        .fold(Form::new(), |form, (key, value)| {
            form.text(key.clone(), value.clone())
        })
        .file("file", file_path)
        .map_err(|source| HelperError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;

    let client = Client::builder().timeout(TIMEOUT).build()?;
    let mut request = client.post(endpoint).multipart(form);
    if let Some(key) = api_key.filter(|key| !key.is_empty()) {
        request = request.bearer_auth(key);
    }

    debug!(endpoint, file = %file_path.display(), "Uploading file");
    let response = request.send()?;
    let status = response.status();
    let body = response.text()?;
    info!(endpoint, %status, "Upload finished");

    Ok(UploadResponse::from_body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::test_server::serve_once;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    fn sample_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("sample.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "hello upload").unwrap();
        path
    }

    #[test]
    fn test_json_response() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_file(&dir);
        let (url, server) = serve_once("200 OK", "application/json", r#"{"id":7}"#);

        let fields = vec![("title".to_string(), "demo".to_string())];
        let response = upload_file(&format!("{}/upload", url), &path, Some("key123"), &fields)
            .unwrap();
        assert_eq!(response, UploadResponse::Json(json!({"id": 7})));

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /upload "));
        assert!(request.to_lowercase().contains("authorization: bearer key123"));
        assert!(request.contains(r#"name="file"; filename="sample.txt""#));
        assert!(request.contains("hello upload"));
        assert!(request.contains(r#"name="title""#));
    }

    #[test]
    fn test_text_response_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_file(&dir);
        let (url, server) = serve_once("200 OK", "text/plain", "stored ok");

        let response = upload_file(&url, &path, None, &[]).unwrap();
        assert_eq!(response, UploadResponse::Text("stored ok".to_string()));
        assert_eq!(response.to_string(), "stored ok");

        let request = server.join().unwrap();
        assert!(!request.to_lowercase().contains("authorization:"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.bin");
        let err = upload_file("http://127.0.0.1:9", &missing, None, &[]).unwrap_err();
        assert!(matches!(err, HelperError::MissingPath(path) if path == missing));
    }
}
