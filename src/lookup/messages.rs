//! Wire types for the CKAN `datastore_search` action.

use serde::Deserialize;

use super::{LookupError, LookupResult, VehicleRecord};

/// Top-level CKAN action envelope.
///
/// Only `success` is required; `result` is absent on failed actions.
#[derive(Debug, Deserialize)]
pub(crate) struct DatastoreResponse {
    pub success: bool,
    #[serde(default)]
    pub result: Option<DatastoreResult>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DatastoreResult {
    #[serde(default)]
    pub records: Vec<VehicleRecord>,
}

impl DatastoreResponse {
    /// Map the envelope to a lookup outcome, keeping only the first record.
    pub fn into_lookup_result(self) -> LookupResult {
        if !self.success {
            return LookupResult::UpstreamError(LookupError::Api);
        }

        match self
            .result
            .and_then(|result| result.records.into_iter().next())
        {
            Some(record) => LookupResult::Found(record),
            None => LookupResult::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> DatastoreResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_first_record_returned_verbatim() {
        let response = parse(json!({
            "success": true,
            "result": {
                "records": [
                    {"_id": 7, "mispar_rechev": 60570703, "tozeret_nm": "טויוטה"},
                    {"_id": 8, "mispar_rechev": 1}
                ]
            }
        }));

        let expected = json!({"_id": 7, "mispar_rechev": 60570703, "tozeret_nm": "טויוטה"});
        assert_eq!(
            response.into_lookup_result(),
            LookupResult::Found(expected.as_object().unwrap().clone())
        );
    }

    #[test]
    fn test_empty_records_is_not_found() {
        let response = parse(json!({"success": true, "result": {"records": []}}));
        assert_eq!(response.into_lookup_result(), LookupResult::NotFound);
    }

    #[test]
    fn test_missing_result_is_not_found() {
        let response = parse(json!({"success": true}));
        assert_eq!(response.into_lookup_result(), LookupResult::NotFound);
    }

    #[test]
    fn test_success_false_is_api_error() {
        let response = parse(json!({
            "success": false,
            "error": {"__type": "Validation Error", "filters": ["bad field"]}
        }));
        assert_eq!(
            response.into_lookup_result(),
            LookupResult::UpstreamError(LookupError::Api)
        );
    }

    #[test]
    fn test_missing_success_flag_does_not_parse() {
        let result = serde_json::from_value::<DatastoreResponse>(json!({"result": {}}));
        assert!(result.is_err());
    }
}
