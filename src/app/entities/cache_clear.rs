// SPDX-License-Identifier: GPL-3.0-only

use serde::Deserialize;

const SUCCESS: &str = "success";

/// Body of `GET /clear-cache`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheClearResult {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub keys_deleted: Option<u64>,
}

impl CacheClearResult {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }

    /// Server supplied reason, empty when the backend sent none
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}
