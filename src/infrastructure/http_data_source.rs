// REST data source talking to the admin backend
use crate::application::data_source::{AdminDataSource, DataSourceError, DataSourceResult};
use crate::domain::alert::{Alert, AlertFilter, AlertStatus};
use crate::domain::community::{CommunityFilter, CommunityPost, PostStatus};
use crate::domain::filter::FilterControls;
use crate::domain::maintenance::{MaintenanceFilter, MaintenanceRequest, MaintenanceStatus};
use crate::domain::overview::Overview;
use crate::domain::package::{NewPackage, Package, PackageFilter, PackageStatus};
use crate::domain::room::{Room, RoomHistory};
use crate::infrastructure::config::BackendSettings;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusChange<'a> {
    status: &'a str,
}

fn transport(e: reqwest::Error) -> DataSourceError {
    DataSourceError::Transport(e.to_string())
}

impl HttpDataSource {
    pub fn new(settings: &BackendSettings) -> DataSourceResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(cookie) = &settings.session_cookie {
            let value = HeaderValue::from_str(cookie).map_err(|e| {
                DataSourceError::InvalidConfig(format!("session cookie is not a valid header: {e}"))
            })?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| DataSourceError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("{}/api/admin", settings.base_url.trim_end_matches('/')),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of one record, with the id percent-encoded
    fn item_url(&self, collection: &str, id: &str) -> String {
        format!("{}{}/{}", self.base_url, collection, urlencoding::encode(id))
    }

    async fn fetch<T>(&self, url: String, query: &[(&'static str, String)]) -> DataSourceResult<T>
    where
        T: DeserializeOwned + Default,
    {
        tracing::debug!(%url, ?query, "GET");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(transport)?;

        let payload = Self::read_payload(response).await?;
        unwrap_data(payload)
    }

    async fn mutate(&self, request: RequestBuilder) -> DataSourceResult<()> {
        let response = request.send().await.map_err(transport)?;
        tracing::debug!(url = %response.url(), status = %response.status(), "mutation answered");
        Self::read_payload(response).await.map(|_| ())
    }

    async fn change_status(&self, url: String, status: &str) -> DataSourceResult<()> {
        tracing::debug!(%url, status, "PATCH");
        self.mutate(self.client.patch(&url).json(&StatusChange { status }))
            .await
    }

    async fn delete(&self, url: String) -> DataSourceResult<()> {
        tracing::debug!(%url, "DELETE");
        self.mutate(self.client.delete(&url)).await
    }

    /// Body of a response as JSON, or the backend's refusal
    async fn read_payload(response: Response) -> DataSourceResult<Value> {
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            return Err(DataSourceError::Rejected {
                status: status.as_u16(),
                message,
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| DataSourceError::Decode(e.to_string()))
    }
}

/// Payloads are `{data: ...}`. Without a `data` field the payload itself is
/// tried, and anything unreadable there counts as empty.
fn unwrap_data<T>(payload: Value) -> DataSourceResult<T>
where
    T: DeserializeOwned + Default,
{
    match payload {
        Value::Object(mut fields) if fields.contains_key("data") => match fields.remove("data") {
            Some(Value::Null) | None => Ok(T::default()),
            Some(data) => {
                serde_json::from_value(data).map_err(|e| DataSourceError::Decode(e.to_string()))
            }
        },
        Value::Null => Ok(T::default()),
        other => Ok(serde_json::from_value(other).unwrap_or_default()),
    }
}

#[async_trait]
impl AdminDataSource for HttpDataSource {
    async fn overview(&self) -> DataSourceResult<Overview> {
        self.fetch(self.url("/overview"), &[]).await
    }

    async fn list_rooms(&self) -> DataSourceResult<Vec<Room>> {
        self.fetch(self.url("/rooms"), &[]).await
    }

    async fn room_history(&self, room_id: &str) -> DataSourceResult<RoomHistory> {
        let url = format!("{}/history", self.item_url("/rooms", room_id));
        self.fetch(url, &[]).await
    }

    async fn list_alerts(&self, filter: &AlertFilter) -> DataSourceResult<Vec<Alert>> {
        self.fetch(self.url("/alerts"), &filter.query_pairs()).await
    }

    async fn update_alert_status(&self, alert_id: &str, status: AlertStatus) -> DataSourceResult<()> {
        self.change_status(self.item_url("/alerts", alert_id), status.as_str())
            .await
    }

    async fn list_maintenance(
        &self,
        filter: &MaintenanceFilter,
    ) -> DataSourceResult<Vec<MaintenanceRequest>> {
        self.fetch(self.url("/maintenance"), &filter.query_pairs()).await
    }

    async fn update_maintenance_status(
        &self,
        request_id: &str,
        status: MaintenanceStatus,
    ) -> DataSourceResult<()> {
        self.change_status(self.item_url("/maintenance", request_id), status.as_str())
            .await
    }

    async fn list_packages(&self, filter: &PackageFilter) -> DataSourceResult<Vec<Package>> {
        self.fetch(self.url("/packages"), &filter.query_pairs()).await
    }

    async fn create_package(&self, package: &NewPackage) -> DataSourceResult<()> {
        let url = self.url("/packages");
        tracing::debug!(%url, resident_id = %package.resident_id, "POST");
        self.mutate(self.client.post(&url).json(package)).await
    }

    async fn update_package_status(
        &self,
        package_id: &str,
        status: PackageStatus,
    ) -> DataSourceResult<()> {
        self.change_status(self.item_url("/packages", package_id), status.as_str())
            .await
    }

    async fn delete_package(&self, package_id: &str) -> DataSourceResult<()> {
        self.delete(self.item_url("/packages", package_id)).await
    }

    async fn list_posts(&self, filter: &CommunityFilter) -> DataSourceResult<Vec<CommunityPost>> {
        self.fetch(self.url("/community/posts"), &filter.query_pairs())
            .await
    }

    async fn update_post_status(&self, post_id: &str, status: PostStatus) -> DataSourceResult<()> {
        self.change_status(self.item_url("/community/posts", post_id), status.as_str())
            .await
    }

    async fn delete_post(&self, post_id: &str) -> DataSourceResult<()> {
        self.delete(self.item_url("/community/posts", post_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::action::RowAction;
    use crate::domain::alert::Severity;
    use crate::domain::reported::Reported;
    use axum::extract::{OriginalUri, Path, RawQuery, State};
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::{delete, get, patch};
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Requests seen by the stub backend, as "METHOD path?query body"
    type Log = Arc<Mutex<Vec<String>>>;

    fn record(log: &Log, line: String) {
        log.lock().unwrap().push(line);
    }

    async fn list_alerts(State(log): State<Log>, RawQuery(query): RawQuery) -> Json<Value> {
        record(&log, format!("GET /alerts?{}", query.unwrap_or_default()));
        Json(json!({"data": [
            {"alert_id": "a1", "type": "Smoke", "severity": "high", "apartment_id": "3B",
             "room_id": "Room 403", "status": "open", "created_at": "2024-05-01T10:00:00Z"},
            {"alert_id": "a0", "type": "Door", "severity": "high", "status": "resolved"},
            {"alert_id": "a2", "type": "Noise", "severity": "High", "status": "ignored"},
            {"alert_id": 3, "type": "Smoke", "severity": "HIGH", "status": "NEW"}
        ]}))
    }

    async fn list_posts() -> Json<Value> {
        Json(json!({"data": [
            {"post_id": 7, "title": "Free Chair", "status": "active"},
            {"post_id": "c2", "title": "Soup swap", "status": "Archived"}
        ]}))
    }

    async fn patch_alert(
        State(log): State<Log>,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        record(&log, format!("PATCH /alerts/{id} {body}"));
        if id == "a1" {
            (StatusCode::OK, Json(json!({"data": {"alert_id": id, "status": body["status"]}})))
        } else {
            (StatusCode::NOT_FOUND, Json(json!({"error": "Alert not found"})))
        }
    }

    async fn overview() -> Json<Value> {
        Json(json!({"counts": {"alerts_unresolved": 4, "packages_unpicked": 2}}))
    }

    async fn rooms(headers: AxumHeaders) -> (StatusCode, Json<Value>) {
        let cookie = headers.get("cookie").and_then(|v| v.to_str().ok());
        if cookie == Some("session=abc123") {
            (StatusCode::OK, Json(json!({"data": [{"room_id": "r1", "apartment_id": "3B"}]})))
        } else {
            (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"})))
        }
    }

    async fn room_history(State(log): State<Log>, OriginalUri(uri): OriginalUri) -> Json<Value> {
        record(&log, format!("GET {}", uri.path()));
        Json(json!({"data": {"readings": [
            {"timestamp": "2024-05-01T09:00:00Z", "temperature": 21.5, "motion": 0},
            {"timestamp": "2024-05-01T10:00:00Z", "temperature": 22.0, "motion": 1}
        ]}}))
    }

    async fn list_packages() -> Json<Value> {
        Json(json!({}))
    }

    async fn create_package(State(log): State<Log>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        record(&log, format!("POST /packages {body}"));
        (StatusCode::CREATED, Json(json!({"data": {"package_id": "p9"}})))
    }

    async fn delete_package(State(log): State<Log>, Path(id): Path<String>) -> (StatusCode, &'static str) {
        record(&log, format!("DELETE /packages/{id}"));
        (StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>")
    }

    async fn delete_post(State(log): State<Log>, Path(id): Path<String>) -> StatusCode {
        record(&log, format!("DELETE /community/posts/{id}"));
        StatusCode::NO_CONTENT
    }

    async fn spawn_backend() -> (String, Log) {
        let log: Log = Arc::default();
        let router = Router::new()
            .route("/api/admin/alerts", get(list_alerts))
            .route("/api/admin/alerts/:id", patch(patch_alert))
            .route("/api/admin/overview", get(overview))
            .route("/api/admin/rooms", get(rooms))
            .route("/api/admin/rooms/:id/history", get(room_history))
            .route("/api/admin/packages", get(list_packages).post(create_package))
            .route("/api/admin/packages/:id", delete(delete_package))
            .route("/api/admin/community/posts", get(list_posts))
            .route("/api/admin/community/posts/:id", delete(delete_post))
            .with_state(log.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (format!("http://{addr}/"), log)
    }

    fn source(base_url: &str) -> HttpDataSource {
        HttpDataSource::new(&BackendSettings {
            base_url: base_url.to_string(),
            session_cookie: Some("session=abc123".to_string()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_filters_become_query_parameters() {
        let (base_url, log) = spawn_backend().await;
        let source = source(&base_url);

        let filter = AlertFilter {
            severity: Some(Severity::High),
            status: None,
        };
        let alerts = source.list_alerts(&filter).await.unwrap();
        let ids: Vec<&str> = alerts.iter().map(|a| a.alert_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a0", "a2", "3"]);

        source.list_alerts(&AlertFilter::default()).await.unwrap();
        let log = log.lock().unwrap();
        assert_eq!(log[0], "GET /alerts?severity=high");
        assert_eq!(log[1], "GET /alerts?");
    }

    #[tokio::test]
    async fn test_unlisted_values_do_not_fail_the_list() {
        let (base_url, _) = spawn_backend().await;
        let source = source(&base_url);

        let alerts = source.list_alerts(&AlertFilter::default()).await.unwrap();
        assert_eq!(alerts.len(), 4);
        assert!(alerts
            .iter()
            .all(|a| a.severity == Some(Severity::High.into())));
        assert_eq!(alerts[2].status, Reported::Other("ignored".to_string()));
        assert!(alerts[2].actions().is_empty());
        assert!(alerts[3].status.is(AlertStatus::Open));
        assert_eq!(alerts[3].actions(), vec![RowAction::Resolve]);

        let posts = source.list_posts(&CommunityFilter::default()).await.unwrap();
        let ids: Vec<&str> = posts.iter().map(|p| p.post_id.as_str()).collect();
        assert_eq!(ids, vec!["7", "c2"]);
        assert_eq!(posts[1].actions(), vec![RowAction::Delete]);
    }

    #[tokio::test]
    async fn test_status_change_and_backend_refusal() {
        let (base_url, log) = spawn_backend().await;
        let source = source(&base_url);

        source
            .update_alert_status("a1", AlertStatus::Resolved)
            .await
            .unwrap();
        let err = source
            .update_alert_status("a404", AlertStatus::Resolved)
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Failed to update alert status"), "Alert not found");
        assert!(matches!(err, DataSourceError::Rejected { status: 404, .. }));

        assert_eq!(log.lock().unwrap()[0], r#"PATCH /alerts/a1 {"status":"resolved"}"#);
    }

    #[tokio::test]
    async fn test_unwrapped_overview_and_missing_list_data() {
        let (base_url, _) = spawn_backend().await;
        let source = source(&base_url);

        let overview = source.overview().await.unwrap();
        assert_eq!(overview.counts.alerts_unresolved, Some(4));
        assert_eq!(overview.counts.maintenance_open, None);

        let packages = source.list_packages(&PackageFilter::default()).await.unwrap();
        assert!(packages.is_empty());
    }

    #[tokio::test]
    async fn test_session_cookie_is_sent() {
        let (base_url, _) = spawn_backend().await;
        let rooms = source(&base_url).list_rooms().await.unwrap();
        assert_eq!(rooms.len(), 1);

        let anonymous = HttpDataSource::new(&BackendSettings {
            base_url: base_url.clone(),
            session_cookie: None,
            timeout_secs: 5,
        })
        .unwrap();
        let err = anonymous.list_rooms().await.unwrap_err();
        assert_eq!(err.user_message("fallback"), "Unauthorized");
    }

    #[tokio::test]
    async fn test_ids_are_percent_encoded() {
        let (base_url, log) = spawn_backend().await;
        let source = source(&base_url);
        let history = source.room_history("Room 403").await.unwrap();
        assert_eq!(history.readings.len(), 2);
        assert!(history.latest().motion_detected());
        source.room_history("3B/Den?x=1").await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log[0], "GET /api/admin/rooms/Room%20403/history");
        assert_eq!(log[1], "GET /api/admin/rooms/3B%2FDen%3Fx%3D1/history");
    }

    #[tokio::test]
    async fn test_create_posts_form_fields() {
        let (base_url, log) = spawn_backend().await;
        let form = NewPackage::from_form("3B", "UPS", "Locker A-05").unwrap();
        source(&base_url).create_package(&form).await.unwrap();

        let line = log.lock().unwrap()[0].clone();
        let body: Value = serde_json::from_str(line.trim_start_matches("POST /packages ")).unwrap();
        assert_eq!(
            body,
            json!({"resident_id": "3B", "carrier": "UPS", "location": "Locker A-05"})
        );
    }

    #[tokio::test]
    async fn test_deletes_and_opaque_errors() {
        let (base_url, log) = spawn_backend().await;
        let source = source(&base_url);

        source.delete_post("c1").await.unwrap();

        let err = source.delete_package("p1").await.unwrap_err();
        assert_eq!(
            err,
            DataSourceError::Rejected {
                status: 502,
                message: None,
                body: "<html>Bad Gateway</html>".to_string(),
            }
        );
        assert_eq!(err.user_message("Failed to delete package"), "Failed to delete package");

        let log = log.lock().unwrap();
        assert_eq!(log[0], "DELETE /community/posts/c1");
        assert_eq!(log[1], "DELETE /packages/p1");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = source(&format!("http://{addr}"))
            .list_alerts(&AlertFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DataSourceError::Transport(_)));
    }

    #[test]
    fn test_invalid_cookie_is_a_config_error() {
        let err = HttpDataSource::new(&BackendSettings {
            base_url: "http://127.0.0.1:5001".to_string(),
            session_cookie: Some("bad\nvalue".to_string()),
            timeout_secs: 5,
        })
        .unwrap_err();
        assert!(matches!(err, DataSourceError::InvalidConfig(_)));
    }
}
