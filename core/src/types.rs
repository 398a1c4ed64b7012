//! Response envelopes and entities for the GitHub API.

use serde::{Deserialize, Serialize};
use url::Url;

/// Envelope returned by list endpoints such as search.
///
/// `items` keeps server order and may be shorter than `total_count` when the
/// result spans several pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsResponse<Item> {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<Item>,
}

/// A GitHub account as it appears in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub id: u64,
    pub node_id: String,
    pub avatar_url: Url,
    pub gravatar_id: String,
    pub url: Url,
    pub received_events_url: Url,
    #[serde(rename = "type")]
    pub kind: String,
}
