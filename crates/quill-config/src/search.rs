//! Paper search service configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://export.arxiv.org/api/query".to_string()
}

/// Upper bound on one search request, in seconds.
const fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    "quill/0.1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// arXiv API query endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}
