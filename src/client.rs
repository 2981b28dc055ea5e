//! Graduates endpoint client.
//!
//! A single GET returning a JSON array of [`RawGraduate`]. Every failure
//! mode maps onto [`FetchError`], whose `Display` text is what the
//! dashboard shows to the user.

use crate::models::RawGraduate;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Why loading graduate rows failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("Error de conexión: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Error {0} al cargar datos")]
    Status(u16),

    /// The body was not a JSON array of graduate rows.
    #[error("Respuesta inválida del backend: {0}")]
    Decode(String),

    /// A local input file could not be read.
    #[error("No se pudo leer {path}: {message}")]
    Io { path: String, message: String },

    /// The load was abandoned before it finished.
    #[error("Carga cancelada")]
    Cancelled,
}

/// HTTP client for `GET {base_url}/analytics/graduates`.
#[derive(Debug, Clone)]
pub struct GraduatesClient {
    http_client: reqwest::Client,
    url: String,
}

impl GraduatesClient {
    /// Create a client for the full endpoint `url`.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch every graduate row. The response is accepted or rejected wholesale.
    pub async fn fetch_rows(&self) -> Result<Vec<RawGraduate>, FetchError> {
        info!("Fetching graduates from {}", self.url);

        let response = self.http_client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Transport(format!("tiempo de espera agotado ({})", self.url))
            } else if e.is_connect() {
                FetchError::Transport(format!("no se pudo conectar a {}", self.url))
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let rows = parse_rows(&body)?;

        debug!("Received {} rows ({} bytes)", rows.len(), body.len());
        Ok(rows)
    }
}

/// Decode a JSON array of graduate rows.
pub fn parse_rows(body: &str) -> Result<Vec<RawGraduate>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Read graduate rows from a local JSON file.
pub async fn read_rows_from_file(path: &Path) -> Result<Vec<RawGraduate>, FetchError> {
    info!("Reading graduates from {}", path.display());

    let body = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FetchError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    parse_rows(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port, returning the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/analytics/graduates", addr)
    }

    #[tokio::test]
    async fn test_fetch_rows_success() {
        let url = serve_once(
            "200 OK",
            r#"[{"rut":"1-9","career":"Derecho","graduation_date":"2020-03-01","work_current":true,"country":"Chile","company":"Bci","department":"Legal y Compliance","role":"Abogado","industry":"Banca y Finanzas","job_start_date":null}]"#,
        )
        .await;

        let client = GraduatesClient::new(url, Some(Duration::from_secs(5))).unwrap();
        let rows = client.fetch_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].company, "Bci");
        assert_eq!(rows[0].graduation_date.as_deref(), Some("2020-03-01"));
    }

    #[tokio::test]
    async fn test_fetch_rows_status_error() {
        let url = serve_once("404 Not Found", r#"{"detail":"Excel file not found"}"#).await;

        let client = GraduatesClient::new(url, Some(Duration::from_secs(5))).unwrap();
        let err = client.fetch_rows().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
        assert_eq!(err.to_string(), "Error 404 al cargar datos");
    }

    #[tokio::test]
    async fn test_fetch_rows_decode_error() {
        let url = serve_once("200 OK", r#"{"rows": []}"#).await;

        let client = GraduatesClient::new(url, Some(Duration::from_secs(5))).unwrap();
        let err = client.fetch_rows().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_rows_connection_refused() {
        // Bind then drop to get a port nobody listens on.
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let client = GraduatesClient::new(format!("http://{}/analytics/graduates", addr), None)
            .unwrap();

        let err = client.fetch_rows().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn test_parse_rows_accepts_null_text_fields() {
        let body = r#"[
            {"rut": "1-9", "career": "Derecho", "work_current": true, "company": null,
             "department": null, "role": null, "industry": null, "country": null},
            {"rut": "2-7", "career": "Psicología", "work_current": false, "company": "Bci"}
        ]"#;

        let rows = parse_rows(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].company.is_empty());
        assert_eq!(rows[1].company, "Bci");

        let records = crate::normalize::normalize_rows(&rows);
        assert_eq!(records[0].company, None);
        assert_eq!(records[0].industry, None);
        assert_eq!(records[1].company.as_deref(), Some("Bci"));
    }

    #[test]
    fn test_parse_rows_empty_array() {
        assert!(parse_rows("[]").unwrap().is_empty());
        assert!(parse_rows("not json").is_err());
    }

    #[test]
    fn test_read_rows_from_missing_file() {
        let err = tokio_test::block_on(read_rows_from_file(Path::new(
            "/nonexistent/graduates.json",
        )))
        .unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }
}
