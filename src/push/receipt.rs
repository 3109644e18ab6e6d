// src/push/receipt.rs
// =============================================================================
// The push API answers with a small JSON object, for example:
//
//   {"remain":4999997,"success":3,"not_same_site":[],"not_valid":[]}
//   {"success_batch":2,"remain_batch":498}
//   {"error":401,"message":"token is not valid"}
//
// We only log and summarize it, so every field is optional and unknown
// fields are ignored. Bodies that are not JSON (the beacon answers with a
// GIF) simply give no receipt.
// =============================================================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// URLs accepted by an instant push
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<u64>,
    /// Instant-push quota left for today
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remain: Option<u64>,
    /// URLs accepted by a weekly-mobile push
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_batch: Option<u64>,
    /// Weekly-mobile quota left
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remain_batch: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_same_site: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_valid: Vec<String>,
    /// Error code; present only when the service refused the push
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Receipt {
    /// Decodes a response body, or `None` if it is not a JSON object.
    pub fn parse(body: &str) -> Option<Self> {
        let trimmed = body.trim();
        if !trimmed.starts_with('{') {
            return None;
        }
        serde_json::from_str(trimmed).ok()
    }

    /// URLs the service says it took, whichever mode answered.
    pub fn accepted(&self) -> Option<u64> {
        self.success.or(self.success_batch)
    }

    /// Quota left, whichever mode answered.
    pub fn remaining(&self) -> Option<u64> {
        self.remain.or(self.remain_batch)
    }
}
