//! Backend API client
//!
//! One async method per endpoint. Intent actions spawn these through the
//! runtime's keyed requests; results come back as `Did*` actions. No async
//! in reducers or components.
//!
//! Error contract: the body is parsed as JSON regardless of HTTP status.
//! A JSON body carrying an `error` field and a non-2xx JSON body are both
//! [`ApiError::Backend`]; connection-level failures are
//! [`ApiError::Transport`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures surfaced to the UI, split by origin
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server could not be reached at all
    #[error("サーバーに接続できませんでした: {0}")]
    Transport(String),
    /// The server answered with an application error message
    #[error("{0}")]
    Backend(String),
}

// ============================================================================
// Wire types
// ============================================================================

/// Per-dataset counters from GET /api/v1/scraping/status
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetStats {
    pub total: u64,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Alert counter (no update timestamp, alerts are live)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlertStats {
    pub total: u64,
}

/// Admin statistics payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScrapingStatus {
    pub hospitals: DatasetStats,
    pub news: DatasetStats,
    pub alerts: AlertStats,
}

/// Status discriminant of a scrape job envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum JobStatus {
    /// Immediate scrape finished
    Completed,
    /// Background scrape accepted and running
    Started,
    /// The job failed
    Error,
    /// Anything the server may add later
    Other(String),
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "completed" => JobStatus::Completed,
            "started" => JobStatus::Started,
            "error" => JobStatus::Error,
            _ => JobStatus::Other(s),
        }
    }
}

/// Response envelope from the scrape trigger endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobEnvelope {
    pub status: JobStatus,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl JobEnvelope {
    /// Synthetic error envelope for transport failures, mirroring what the
    /// server would send for a failed job.
    pub fn transport_failure(error: &ApiError) -> Self {
        Self {
            status: JobStatus::Error,
            message: format!("エラーが発生しました: {}", error),
            data: None,
            timestamp: None,
        }
    }
}

/// Severity of a health alert, defaulting to informational
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Danger,
    Warning,
    #[serde(other)]
    Info,
}

/// An active health alert
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthAlert {
    pub title: String,
    pub message: String,
    pub severity: AlertSeverity,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub valid_until: Option<String>,
}

/// A health news article
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// A selectable symptom suggestion for a body-area category
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub common: bool,
}

/// NLP-parsed symptom returned by the symptom submit endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParsedSymptom {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    pub category: String,
    #[serde(default)]
    pub severity: Option<u8>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Urgency of a diagnosis; anything unrecognized reads as low
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    High,
    Medium,
    #[serde(other)]
    Low,
}

/// A recommended medical specialty
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Specialty {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Diagnosis inference result
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Diagnosis {
    #[serde(default)]
    pub possible_conditions: Vec<String>,
    #[serde(default)]
    pub recommended_specialties: Vec<Specialty>,
    pub urgency_level: UrgencyLevel,
    pub advice: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Request body for POST /diagnosis/analyze
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisRequest {
    pub symptoms: Vec<String>,
    pub patient_age: Option<u32>,
    pub patient_gender: Option<String>,
    pub duration: Option<String>,
    pub severity: Option<u8>,
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client over the backend API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// Create a client for the given base URL (trailing slash stripped).
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// GET /api/v1/scraping/status
    pub async fn scraping_status(&self) -> Result<ScrapingStatus, ApiError> {
        let response = self
            .http
            .get(self.url("/api/v1/scraping/status"))
            .send()
            .await
            .map_err(transport)?;
        parse_json(response).await
    }

    /// POST /api/v1/scraping/hospitals/scrape[/immediate]
    pub async fn scrape_hospitals(
        &self,
        prefectures: Vec<String>,
        immediate: bool,
    ) -> Result<JobEnvelope, ApiError> {
        let path = if immediate {
            "/api/v1/scraping/hospitals/scrape/immediate"
        } else {
            "/api/v1/scraping/hospitals/scrape"
        };
        let response = self
            .http
            .post(self.url(path))
            .json(&serde_json::json!({ "prefectures": prefectures }))
            .send()
            .await
            .map_err(transport)?;
        parse_json(response).await
    }

    /// POST /api/v1/scraping/news/scrape[/immediate]
    pub async fn scrape_news(&self, immediate: bool) -> Result<JobEnvelope, ApiError> {
        let path = if immediate {
            "/api/v1/scraping/news/scrape/immediate"
        } else {
            "/api/v1/scraping/news/scrape"
        };
        let response = self
            .http
            .post(self.url(path))
            .send()
            .await
            .map_err(transport)?;
        parse_json(response).await
    }

    /// POST /api/v1/scraping/all/scrape
    pub async fn scrape_all(&self) -> Result<JobEnvelope, ApiError> {
        let response = self
            .http
            .post(self.url("/api/v1/scraping/all/scrape"))
            .send()
            .await
            .map_err(transport)?;
        parse_json(response).await
    }

    /// GET /api/v1/news/health-alerts
    pub async fn health_alerts(&self) -> Result<Vec<HealthAlert>, ApiError> {
        let response = self
            .http
            .get(self.url("/api/v1/news/health-alerts"))
            .send()
            .await
            .map_err(transport)?;
        parse_json(response).await
    }

    /// GET /api/v1/news/health-news?category=&limit=
    pub async fn health_news(
        &self,
        category: Option<&str>,
        limit: usize,
    ) -> Result<Vec<NewsItem>, ApiError> {
        let mut url = format!("{}?limit={}", self.url("/api/v1/news/health-news"), limit);
        if let Some(category) = category {
            url.push_str("&category=");
            url.push_str(&urlencoding::encode(category));
        }
        let response = self.http.get(url).send().await.map_err(transport)?;
        parse_json(response).await
    }

    /// GET /api/v1/symptoms/suggestions?category=
    pub async fn symptom_suggestions(&self, category: &str) -> Result<Vec<Suggestion>, ApiError> {
        let url = format!(
            "{}?category={}",
            self.url("/api/v1/symptoms/suggestions"),
            urlencoding::encode(category)
        );
        let response = self.http.get(url).send().await.map_err(transport)?;
        parse_json(response).await
    }

    /// POST /symptom/input (multipart form)
    pub async fn submit_symptom(&self, text: String) -> Result<ParsedSymptom, ApiError> {
        let form = reqwest::multipart::Form::new().text("text", text);
        let response = self
            .http
            .post(self.url("/symptom/input"))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        parse_json(response).await
    }

    /// POST /diagnosis/analyze (JSON)
    pub async fn analyze(&self, request: DiagnosisRequest) -> Result<Diagnosis, ApiError> {
        let response = self
            .http
            .post(self.url("/diagnosis/analyze"))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;
        parse_json(response).await
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

/// Parse the body as JSON whatever the status, then decide success.
///
/// FastAPI-style backends put application errors in the body (`error`
/// field, or `detail` with a 4xx/5xx status); both map to
/// `ApiError::Backend`.
async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(transport)?;

    let value: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Backend(format!("不正な応答: {}", e)))?;

    if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
        return Err(ApiError::Backend(message.to_string()));
    }
    if !status.is_success() {
        let message = value
            .get("detail")
            .or_else(|| value.get("message"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("サーバーエラー ({})", status.as_u16()));
        return Err(ApiError::Backend(message));
    }

    serde_json::from_value(value).map_err(|e| ApiError::Backend(format!("不正な応答: {}", e)))
}
