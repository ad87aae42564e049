//! HTTP client for the resume-matching backend.
//!
//! The backend is opaque: it extracts resume text, scores the match and
//! rewrites bullets. This module only knows its three JSON contracts.

use crate::domain::{
    AnalysisResult, AnalyzeRequest, Operation, RewriteRequest, RewriteResponse, RewrittenBullet,
    UploadResponse,
};
use reqwest::StatusCode;
use reqwest::blocking::{Client, multipart};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const UPLOAD_PATH: &str = "/upload-resume";
pub const ANALYZE_PATH: &str = "/analyze";
pub const REWRITE_PATH: &str = "/rewrite-bullets";

/// Ways a backend exchange can fail once it has been started.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{} (HTTP {status})", .operation.failure_message())]
    Status { operation: Operation, status: u16 },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The three backend exchanges.
///
/// Implementations must be shareable across threads because each request
/// runs on its own background thread.
pub trait MatcherApi: Send + Sync {
    fn upload_resume(&self, path: &Path) -> ApiResult<UploadResponse>;
    fn analyze(&self, request: &AnalyzeRequest) -> ApiResult<AnalysisResult>;
    fn rewrite_bullets(&self, request: &RewriteRequest) -> ApiResult<Vec<RewrittenBullet>>;
}

/// [`MatcherApi`] backed by a blocking `reqwest` client.
pub struct HttpMatcherApi {
    client: Client,
    base_url: String,
}

impl HttpMatcherApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Uses a preconfigured client, e.g. one with proxies or timeouts set.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Maps a response status to the generic failure for `operation`.
pub fn status_error(operation: Operation, status: StatusCode) -> Option<ApiError> {
    if status.is_success() {
        None
    } else {
        Some(ApiError::Status {
            operation,
            status: status.as_u16(),
        })
    }
}

fn ensure_success(
    operation: Operation,
    response: reqwest::blocking::Response,
) -> ApiResult<reqwest::blocking::Response> {
    match status_error(operation, response.status()) {
        Some(err) => Err(err),
        None => Ok(response),
    }
}

impl MatcherApi for HttpMatcherApi {
    fn upload_resume(&self, path: &Path) -> ApiResult<UploadResponse> {
        let bytes = std::fs::read(path).map_err(|source| ApiError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());

        tracing::debug!(file = %file_name, size = bytes.len(), "uploading resume");
        let form = multipart::Form::new()
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(self.endpoint(UPLOAD_PATH))
            .multipart(form)
            .send()?;
        Ok(ensure_success(Operation::Upload, response)?.json()?)
    }

    fn analyze(&self, request: &AnalyzeRequest) -> ApiResult<AnalysisResult> {
        let response = self
            .client
            .post(self.endpoint(ANALYZE_PATH))
            .json(request)
            .send()?;
        Ok(ensure_success(Operation::Analyze, response)?.json()?)
    }

    fn rewrite_bullets(&self, request: &RewriteRequest) -> ApiResult<Vec<RewrittenBullet>> {
        let response = self
            .client
            .post(self.endpoint(REWRITE_PATH))
            .json(request)
            .send()?;
        let body: RewriteResponse = ensure_success(Operation::Rewrite, response)?.json()?;
        Ok(body.bullets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    /// One-shot HTTP server on a loopback port.
    ///
    /// Answers the first request with `status` and `body`; joining the
    /// handle yields the raw request it received.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });
        (base_url, handle)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let read = stream.read(&mut chunk).unwrap();
            if read == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..read]);

            let Some(head_end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&data[..head_end]).to_lowercase();
            let received = data.len() - (head_end + 4);
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok());
            let complete = match content_length {
                Some(length) => received >= length,
                None if head.contains("transfer-encoding: chunked") => data.ends_with(b"0\r\n\r\n"),
                None => true,
            };
            if complete {
                break;
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    fn body_of(request: &str) -> &str {
        request.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or("")
    }

    fn local_api(base_url: &str) -> HttpMatcherApi {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpMatcherApi::with_client(client, base_url)
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let api = HttpMatcherApi::new("http://localhost:8000/");
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.endpoint(ANALYZE_PATH), "http://localhost:8000/analyze");
        assert_eq!(
            api.endpoint(UPLOAD_PATH),
            "http://localhost:8000/upload-resume"
        );
        assert_eq!(
            api.endpoint(REWRITE_PATH),
            "http://localhost:8000/rewrite-bullets"
        );
    }

    #[test]
    fn test_status_error_only_for_non_success() {
        assert!(status_error(Operation::Analyze, StatusCode::OK).is_none());
        assert!(status_error(Operation::Analyze, StatusCode::CREATED).is_none());

        let err = status_error(Operation::Analyze, StatusCode::INTERNAL_SERVER_ERROR).unwrap();
        assert_eq!(err.to_string(), "Failed to analyze match (HTTP 500)");

        let err = status_error(Operation::Upload, StatusCode::BAD_REQUEST).unwrap();
        assert_eq!(err.to_string(), "Failed to upload file (HTTP 400)");
    }

    #[test]
    fn test_upload_of_missing_file_fails_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");
        // Unroutable base URL: the read error must surface first.
        let api = HttpMatcherApi::new("http://127.0.0.1:9");

        let err = api.upload_resume(&missing).unwrap_err();
        assert!(matches!(err, ApiError::ReadFile { .. }));
        assert!(err.to_string().contains("missing.pdf"));
    }

    #[test]
    fn test_analyze_posts_json_and_decodes_result() {
        let (base_url, server) = serve_once("200 OK", r#"{"score":72,"gaps":["Kubernetes","Go"]}"#);
        let api = local_api(&base_url);

        let result = api
            .analyze(&AnalyzeRequest {
                resume_text: "Ten years of Rust".to_string(),
                job_description: "Senior Rust engineer".to_string(),
            })
            .unwrap();
        assert_eq!(result.score, 72);
        assert_eq!(result.gaps, vec!["Kubernetes".to_string(), "Go".to_string()]);

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /analyze HTTP/1.1\r\n"));
        assert!(request.to_lowercase().contains("content-type: application/json"));
        let sent: Value = serde_json::from_str(body_of(&request)).unwrap();
        assert_eq!(
            sent,
            json!({
                "resume_text": "Ten years of Rust",
                "job_description": "Senior Rust engineer",
            })
        );
    }

    #[test]
    fn test_rewrite_unwraps_bullets_envelope() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"bullets":[{"original":"Fixed bugs","rewritten":"Resolved 40 production defects"}]}"#,
        );
        let api = local_api(&base_url);

        let rewrites = api
            .rewrite_bullets(&RewriteRequest {
                bullets: vec!["Fixed bugs".to_string()],
                job_description: "QA lead".to_string(),
            })
            .unwrap();
        assert_eq!(
            rewrites,
            vec![RewrittenBullet {
                original: "Fixed bugs".to_string(),
                rewritten: "Resolved 40 production defects".to_string(),
            }]
        );

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /rewrite-bullets HTTP/1.1\r\n"));
        let sent: Value = serde_json::from_str(body_of(&request)).unwrap();
        assert_eq!(
            sent,
            json!({ "bullets": ["Fixed bugs"], "job_description": "QA lead" })
        );
    }

    #[test]
    fn test_server_error_maps_to_status() {
        let (base_url, server) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#);
        let api = local_api(&base_url);

        let err = api
            .analyze(&AnalyzeRequest {
                resume_text: "r".to_string(),
                job_description: "j".to_string(),
            })
            .unwrap_err();
        server.join().unwrap();

        assert!(matches!(
            err,
            ApiError::Status {
                operation: Operation::Analyze,
                status: 500
            }
        ));
        assert_eq!(err.to_string(), "Failed to analyze match (HTTP 500)");
    }

    #[test]
    fn test_upload_sends_file_field_with_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "Jane Doe\nBuilt payment systems").unwrap();

        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"text":"Jane Doe\nBuilt payment systems","filename":"cv.txt","bullets":["Built payment systems"]}"#,
        );
        let api = local_api(&base_url);

        let upload = api.upload_resume(&path).unwrap();
        assert_eq!(upload.filename, "cv.txt");
        assert_eq!(upload.text, "Jane Doe\nBuilt payment systems");
        assert_eq!(upload.bullets, vec!["Built payment systems".to_string()]);

        let request = server.join().unwrap();
        let lowered = request.to_lowercase();
        assert!(request.starts_with("POST /upload-resume HTTP/1.1\r\n"));
        assert!(lowered.contains("content-type: multipart/form-data; boundary="));
        assert!(lowered.contains(r#"content-disposition: form-data; name="file"; filename="cv.txt""#));
        assert!(body_of(&request).contains("Jane Doe\nBuilt payment systems"));
    }
}
