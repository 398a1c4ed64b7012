//! Declarative description of one API call.
//!
//! A `Request` names everything `Session` needs to issue a call: where it
//! goes, how, with which headers and query string, and the type its body
//! decodes into. Implementors override only what differs from the defaults.

use serde::de::DeserializeOwned;

use crate::http::{HeaderFields, HttpMethod, QueryParameters};

/// Authority every descriptor targets unless it overrides `base_url`.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// An immutable API call descriptor bound to exactly one response type.
pub trait Request {
    /// Shape the body decodes into on a 2xx response.
    type Response: DeserializeOwned;

    fn method(&self) -> HttpMethod;

    /// Resource path appended to `base_url`.
    fn path(&self) -> &str;

    fn base_url(&self) -> &str {
        DEFAULT_BASE_URL
    }

    fn header_fields(&self) -> HeaderFields {
        HeaderFields::from([("Accept".to_string(), "application/json".to_string())])
    }

    /// `None` means no query string; `Some(vec![])` means an empty one.
    fn query_parameters(&self) -> Option<QueryParameters> {
        None
    }

    /// JSON request body, sent with POST.
    fn body(&self) -> Option<Vec<u8>> {
        None
    }
}
