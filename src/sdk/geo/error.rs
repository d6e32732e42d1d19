use serde::Deserialize;
use thiserror::Error;

// Helper structs to parse the JSON error body the geocoder returns on
// bad keys and malformed queries.
#[derive(Deserialize, Debug)]
pub struct GeocoderErrorPayload {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub error: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum GeocodeError {
    // The structured error from the API
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    // A fallback for when we get an error that isn't in the expected JSON format
    #[error("unstructured API error (status {status}): {body}")]
    RawApiError { status: u16, body: String },

    #[error("underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("malformed coordinate pair in response: {0:?}")]
    MalformedPoint(String),
}
