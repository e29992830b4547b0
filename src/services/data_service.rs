use crate::core::{Dataset, LoadError, Row};
use color_eyre::Result;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Literal marker the backend puts in `status` on success
pub const SUCCESS_STATUS: &str = "success";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// DataService fetches one remote endpoint and turns it into a [`Dataset`]
///
/// This service is responsible for:
/// - Issuing the GET with a bounded timeout
/// - Mapping transport and HTTP status failures to [`LoadError::Network`]
/// - Validating the response envelope and converting rows
#[derive(Debug, Clone)]
pub struct DataService {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl DataService {
    /// Create a service for `endpoint`; every request fails fast after `timeout`
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch and validate the dataset
    pub async fn load(&self) -> std::result::Result<Dataset, LoadError> {
        debug!("GET {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| LoadError::Network(describe_reqwest_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Network(format!("HTTP error! status: {}", status.as_u16())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::Network(describe_reqwest_error(&e)))?;

        parse_response(&body)
    }
}

fn describe_reqwest_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else {
        err.to_string()
    }
}

/// Validate `{ status: "success", message, data: { region: [row, ...] } }`.
///
/// Anything else (non-JSON body, other status, missing or non-object `data`,
/// a region that is not an array, a row that is not an object) is a
/// [`LoadError::MalformedResponse`].
pub fn parse_response(body: &[u8]) -> std::result::Result<Dataset, LoadError> {
    let envelope: Value = serde_json::from_slice(body)
        .map_err(|e| LoadError::MalformedResponse(format!("body is not JSON: {}", e)))?;

    let Value::Object(mut envelope) = envelope else {
        return Err(LoadError::MalformedResponse("body is not an object".to_string()));
    };

    match envelope.get("status") {
        Some(Value::String(s)) if s == SUCCESS_STATUS => {}
        other => {
            return Err(LoadError::MalformedResponse(format!(
                "unexpected status: {}",
                other.map(Value::to_string).unwrap_or_else(|| "<missing>".to_string())
            )));
        }
    }

    if let Some(Value::String(message)) = envelope.get("message") {
        debug!("backend message: {}", message);
    }

    let Some(Value::Object(data)) = envelope.remove("data") else {
        return Err(LoadError::MalformedResponse("data is not an object".to_string()));
    };

    let mut dataset = Dataset::new();
    for (region, rows) in data {
        let Value::Array(rows) = rows else {
            return Err(LoadError::MalformedResponse(format!(
                "region '{}' is not an array",
                region
            )));
        };
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| match row {
                Value::Object(object) => Ok(Row::from_json_object(object)),
                _ => Err(LoadError::MalformedResponse(format!(
                    "row {} of region '{}' is not an object",
                    idx, region
                ))),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        dataset.insert(region, rows);
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_success_keeps_region_and_key_order() {
        let body = br#"{
            "status": "success",
            "message": "ok",
            "data": {
                "GLOBAL": [{"publisher": "ShowHeroes", "cpm": 10.5, "active": true}],
                "EMEA": []
            }
        }"#;

        let dataset = parse_response(body).unwrap();

        assert_eq!(dataset.region_names(), vec!["GLOBAL", "EMEA"]);
        let row = &dataset.rows("GLOBAL")[0];
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["publisher", "cpm", "active"]);
        assert_eq!(row.get("cpm"), Some(&CellValue::Number(10.5)));
    }

    #[test]
    fn test_parse_rejects_non_object_data() {
        let body = br#"{"status": "success", "data": "not-an-object"}"#;
        assert!(matches!(parse_response(body), Err(LoadError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_rejects_other_status() {
        let body = br#"{"status": "error", "message": "boom", "data": {}}"#;
        assert!(matches!(parse_response(body), Err(LoadError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_rejects_null_data() {
        let body = br#"{"status": "success", "data": null}"#;
        assert!(matches!(parse_response(body), Err(LoadError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_response(b"<html>oops</html>"),
            Err(LoadError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_scalar_rows() {
        let body = br#"{"status": "success", "data": {"GLOBAL": [1, 2]}}"#;
        assert!(matches!(parse_response(body), Err(LoadError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_empty_data_is_empty_dataset() {
        let body = br#"{"status": "success", "message": "", "data": {}}"#;
        assert!(parse_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_service_keeps_endpoint_and_timeout() {
        let service = DataService::new("http://localhost:1/data", Duration::from_secs(3)).unwrap();
        assert_eq!(service.endpoint(), "http://localhost:1/data");
        assert_eq!(service.timeout(), Duration::from_secs(3));
    }
}
