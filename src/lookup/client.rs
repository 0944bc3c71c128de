use std::time::Duration;

use serde_json::{Map, Value};
use tracing::instrument;

use crate::config::{UpstreamConfig, UPSTREAM_RESULT_LIMIT};
use crate::plate::PlateQuery;

use super::messages::DatastoreResponse;
use super::{LookupError, LookupResult};

/// Client for the data.gov.il vehicle registry.
///
/// Cheap to clone: the underlying `reqwest::Client` shares one connection pool.
#[derive(Clone, Debug)]
pub struct VehicleLookupClient {
    http: reqwest::Client,
    search_url: String,
    resource_id: String,
    plate_field: String,
    timeout: Duration,
}

impl VehicleLookupClient {
    /// Build a client using the configured timeout.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(config, Duration::from_secs(config.timeout_seconds))
    }

    /// Build a client with an explicit upper bound on each upstream call.
    pub fn with_timeout(config: &UpstreamConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            search_url: config.search_url(),
            resource_id: config.resource_id.clone(),
            plate_field: config.plate_field.clone(),
            timeout,
        })
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Look up a single vehicle by plate.
    ///
    /// Never retries; a failed attempt is reported as `UpstreamError` immediately.
    #[instrument(name = "lookup::vehicle", skip(self), fields(plate = %plate))]
    pub async fn lookup(&self, plate: &PlateQuery) -> LookupResult {
        tracing::debug!("Searching vehicle registry");

        let result = match self.fetch(plate).await {
            Ok(result) => result,
            Err(e) => LookupResult::UpstreamError(e),
        };

        match &result {
            LookupResult::Found(record) => {
                let vehicle = record.get(&self.plate_field).unwrap_or(&Value::Null);
                tracing::info!(vehicle = %vehicle, "Vehicle found");
            }
            LookupResult::NotFound => tracing::info!("Vehicle not found"),
            LookupResult::UpstreamError(e) => {
                tracing::warn!(error = %e, "Vehicle registry lookup failed")
            }
        }

        result
    }

    async fn fetch(&self, plate: &PlateQuery) -> Result<LookupResult, LookupError> {
        let filters = self.exact_match_filter(plate);
        let limit = UPSTREAM_RESULT_LIMIT.to_string();

        let response = self
            .http
            .get(&self.search_url)
            .query(&[
                ("resource_id", self.resource_id.as_str()),
                ("filters", filters.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        let envelope = serde_json::from_slice::<DatastoreResponse>(&body);

        // Only a 2xx answer can yield a record; a non-2xx one is an error either way
        match envelope {
            Ok(envelope) if status.is_success() => Ok(envelope.into_lookup_result()),
            Ok(envelope) if !envelope.success => Err(LookupError::Api),
            Err(e) if status.is_success() => Err(LookupError::Transport(format!(
                "Invalid response from vehicle registry: {}",
                e
            ))),
            _ => Err(LookupError::Transport(format!(
                "Vehicle registry responded with HTTP {}",
                status
            ))),
        }
    }

    /// JSON-encoded `{"<plate_field>": "<plate>"}` for the CKAN `filters` parameter.
    fn exact_match_filter(&self, plate: &PlateQuery) -> String {
        let mut filter = Map::new();
        filter.insert(
            self.plate_field.clone(),
            Value::String(plate.as_str().to_string()),
        );
        Value::Object(filter).to_string()
    }
}

fn transport(e: reqwest::Error) -> LookupError {
    LookupError::Transport(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Instant;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::{DATASTORE_SEARCH_PATH, DEFAULT_RESOURCE_ID};

    fn upstream_config(server: &MockServer) -> UpstreamConfig {
        UpstreamConfig {
            base_url: server.uri(),
            ..UpstreamConfig::default()
        }
    }

    fn plate(raw: &str) -> PlateQuery {
        PlateQuery::parse(Some(raw)).unwrap()
    }

    #[tokio::test]
    async fn test_found_returns_first_record_unmodified() {
        let server = MockServer::start().await;
        let record = json!({
            "_id": 42,
            "mispar_rechev": 60570703,
            "tozeret_nm": "מאזדה יפן",
            "shnat_yitzur": 2015
        });

        Mock::given(method("GET"))
            .and(path(DATASTORE_SEARCH_PATH))
            .and(query_param("resource_id", DEFAULT_RESOURCE_ID))
            .and(query_param("filters", r#"{"mispar_rechev":"60570703"}"#))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"records": [record.clone()], "total": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = VehicleLookupClient::new(&upstream_config(&server)).unwrap();
        let result = client.lookup(&plate("605-70-703")).await;

        assert_eq!(
            result,
            LookupResult::Found(record.as_object().unwrap().clone())
        );
    }

    #[tokio::test]
    async fn test_no_records_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DATASTORE_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"records": [], "total": 0}
            })))
            .mount(&server)
            .await;

        let client = VehicleLookupClient::new(&upstream_config(&server)).unwrap();
        assert_eq!(client.lookup(&plate("1")).await, LookupResult::NotFound);
    }

    #[tokio::test]
    async fn test_success_false_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DATASTORE_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "success": false,
                "error": {"__type": "Validation Error"}
            })))
            .mount(&server)
            .await;

        let client = VehicleLookupClient::new(&upstream_config(&server)).unwrap();
        assert_eq!(
            client.lookup(&plate("1234567")).await,
            LookupResult::UpstreamError(LookupError::Api)
        );
    }

    #[tokio::test]
    async fn test_non_json_error_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DATASTORE_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let client = VehicleLookupClient::new(&upstream_config(&server)).unwrap();
        match client.lookup(&plate("1234567")).await {
            LookupResult::UpstreamError(LookupError::Transport(message)) => {
                assert!(message.contains("502"), "unexpected message: {}", message);
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_with_success_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DATASTORE_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "success": true,
                "result": {"records": [{"mispar_rechev": 1}]}
            })))
            .mount(&server)
            .await;

        let client = VehicleLookupClient::new(&upstream_config(&server)).unwrap();
        match client.lookup(&plate("1")).await {
            LookupResult::UpstreamError(LookupError::Transport(message)) => {
                assert!(message.contains("503"), "unexpected message: {}", message);
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_success_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DATASTORE_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = VehicleLookupClient::new(&upstream_config(&server)).unwrap();
        assert!(matches!(
            client.lookup(&plate("1234567")).await,
            LookupResult::UpstreamError(LookupError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_bounded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DATASTORE_SEARCH_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "result": {"records": []}}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client =
            VehicleLookupClient::with_timeout(&upstream_config(&server), Duration::from_millis(200))
                .unwrap();

        let start = Instant::now();
        let result = client.lookup(&plate("1234567")).await;

        assert!(start.elapsed() < Duration::from_secs(3));
        assert!(matches!(
            result,
            LookupResult::UpstreamError(LookupError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = UpstreamConfig {
            base_url: format!("http://127.0.0.1:{}", port),
            ..UpstreamConfig::default()
        };

        let client = VehicleLookupClient::new(&config).unwrap();
        assert!(matches!(
            client.lookup(&plate("1234567")).await,
            LookupResult::UpstreamError(LookupError::Transport(_))
        ));
    }

    #[test]
    fn test_exact_match_filter_encoding() {
        let client = VehicleLookupClient::new(&UpstreamConfig::default()).unwrap();
        assert_eq!(
            client.exact_match_filter(&plate("12-345-67")),
            r#"{"mispar_rechev":"1234567"}"#
        );
    }
}
