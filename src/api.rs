use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client, Method, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{
    Application, ApplicationCreate, ApplicationList, ListQuery, Stats, Status, StatusUpdate,
};

const USER_AGENT: &str = concat!("applyintel/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

#[derive(Deserialize)]
struct HealthBody {
    ok: bool,
}

impl ApiError {
    async fn from_response(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody {
                detail: serde_json::Value::String(detail),
            }) => detail,
            Ok(ErrorBody { detail }) => detail.to_string(),
            Err(_) if text.trim().is_empty() => "no response body".to_string(),
            Err(_) => text,
        };
        ApiError::Http { status, message }
    }
}

/// Thin client for the applications backend. Every call is one round trip.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        method: &Method,
        path: &str,
    ) -> Result<T, ApiError> {
        debug!("{} {}", method, path);
        let response = request.send().await.inspect_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
        })?;
        if !response.status().is_success() {
            let err = ApiError::from_response(response).await;
            warn!("{} {} rejected: {}", method, path, err);
            return Err(err);
        }
        Ok(response.json().await?)
    }

    pub async fn list_applications(&self, query: &ListQuery) -> Result<ApplicationList, ApiError> {
        let request = self
            .client
            .get(self.url("/applications"))
            .query(&query.to_params());
        self.send(request, &Method::GET, "/applications").await
    }

    pub async fn create_application(
        &self,
        payload: &ApplicationCreate,
    ) -> Result<Application, ApiError> {
        let request = self.client.post(self.url("/applications")).json(payload);
        self.send(request, &Method::POST, "/applications").await
    }

    pub async fn update_status(&self, id: i64, status: Status) -> Result<Application, ApiError> {
        let path = format!("/applications/{}", id);
        let request = self
            .client
            .patch(self.url(&path))
            .json(&StatusUpdate { status });
        self.send(request, &Method::PATCH, &path).await
    }

    pub async fn delete_application(&self, id: i64) -> Result<Application, ApiError> {
        let path = format!("/applications/{}", id);
        let request = self.client.delete(self.url(&path));
        self.send(request, &Method::DELETE, &path).await
    }

    pub async fn restore_application(&self, id: i64) -> Result<Application, ApiError> {
        let path = format!("/applications/{}/restore", id);
        let request = self.client.post(self.url(&path));
        self.send(request, &Method::POST, &path).await
    }

    pub async fn fetch_stats(&self) -> Result<Stats, ApiError> {
        let request = self.client.get(self.url("/stats"));
        self.send(request, &Method::GET, "/stats").await
    }

    pub async fn health(&self) -> Result<bool, ApiError> {
        let request = self.client.get(self.url("/health"));
        let body: HealthBody = self.send(request, &Method::GET, "/health").await?;
        Ok(body.ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn acme_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "company": "Acme",
            "role": "SWE",
            "location": null,
            "url": null,
            "status": "applied",
            "date_applied": "2024-01-01",
            "next_action_date": null,
            "notes": null,
            "created_at": "2024-01-01T09:30:00"
        })
    }

    #[test]
    fn test_rejects_base_url_without_scheme() {
        let err = ApiClient::new("localhost:8000", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_trailing_slash_is_dropped() {
        let api = ApiClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url("/stats"), "http://localhost:8000/stats");
    }

    #[tokio::test]
    async fn test_list_sends_filters_as_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/applications"))
            .and(query_param("q", "acme"))
            .and(query_param("status", "applied"))
            .and(query_param("has_link", "false"))
            .and(query_param("sort_order", "desc"))
            .and(query_param("limit", "10"))
            .and(query_param("offset", "10"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"items": [acme_json(7)], "total": 11})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let query = ListQuery {
            q: Some("acme".to_string()),
            status: Some(Status::Applied),
            has_link: Some(false),
            ..ListQuery::page(2)
        };
        let list = client(&server).list_applications(&query).await.unwrap();
        assert_eq!(list.total, 11);
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].id, 7);
        assert_eq!(list.items[0].location, None);
    }

    #[tokio::test]
    async fn test_create_round_trips_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/applications"))
            .and(body_json(json!({
                "company": "Acme",
                "role": "SWE",
                "location": null,
                "url": null,
                "status": "applied",
                "date_applied": "2024-01-01",
                "next_action_date": null,
                "notes": null
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(acme_json(1)))
            .expect(1)
            .mount(&server)
            .await;

        let payload = ApplicationCreate {
            company: "Acme".to_string(),
            role: "SWE".to_string(),
            location: None,
            url: None,
            status: Status::Applied,
            date_applied: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            next_action_date: None,
            notes: None,
        };
        let created = client(&server).create_application(&payload).await.unwrap();
        assert_eq!(created.company, "Acme");
        assert_eq!(created.date_applied, payload.date_applied);
        assert_eq!(created.notes, None);
    }

    #[tokio::test]
    async fn test_update_status_sends_only_status() {
        let server = MockServer::start().await;
        let mut updated = acme_json(3);
        updated["status"] = json!("interview");
        Mock::given(method("PATCH"))
            .and(path("/applications/3"))
            .and(body_json(json!({"status": "interview"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated))
            .expect(1)
            .mount(&server)
            .await;

        let app = client(&server)
            .update_status(3, Status::Interview)
            .await
            .unwrap();
        assert_eq!(app.status, Status::Interview);
    }

    #[tokio::test]
    async fn test_delete_and_restore_hit_their_routes() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/applications/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(acme_json(4)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/applications/4/restore"))
            .respond_with(ResponseTemplate::new(200).set_body_json(acme_json(4)))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server);
        assert_eq!(api.delete_application(4).await.unwrap().id, 4);
        assert_eq!(api.restore_application(4).await.unwrap().id, 4);
    }

    #[tokio::test]
    async fn test_http_error_uses_detail_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/applications/9"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": "Application not found"})),
            )
            .mount(&server)
            .await;

        let err = client(&server).delete_application(9).await.unwrap_err();
        match err {
            ApiError::Http { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Application not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stats_and_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 4,
                "counts": {"applied": 2, "interview": 1, "offer": 1},
                "response_rate": 0.5,
                "due_today": 1,
                "saved_jobs": 0,
                "interviews": 1
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let api = client(&server);
        let stats = api.fetch_stats().await.unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.count(Status::Offer), 1);
        assert_eq!(stats.count(Status::Saved), 0);
        assert_eq!(stats.response_rate_percent(), 50);
        assert!(api.health().await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = api.fetch_stats().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
