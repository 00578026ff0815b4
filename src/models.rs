use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
pub struct TranscriptRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// One caption line with its start time and duration, both in seconds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TranscriptResponse {
    pub transcript: Vec<TranscriptSegment>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
