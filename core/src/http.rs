//! HTTP transport types shared by the session and its transports.
//!
//! # Design
//! Requests and responses are plain data. `Session` builds an `HttpRequest`
//! from a descriptor, a `Transport` executes it, and the resulting
//! `HttpResponse` is classified back into a typed result. Keeping these as
//! owned values lets the build and classify halves be tested without a
//! network.

use std::collections::BTreeMap;

use url::Url;

/// Header fields keyed by name. Merging treats names case-insensitively.
pub type HeaderFields = BTreeMap<String, String>;

/// Query parameters in emission order. A `None` value drops the pair.
pub type QueryParameters = Vec<(String, Option<String>)>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A fully resolved HTTP request: final URL, merged headers and optional body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: HeaderFields,
    pub body: Option<Vec<u8>>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Every value of the header `name`, joined with `", "` as if the field
    /// lines had been sent as one.
    pub fn header_all(&self, name: &str) -> Option<String> {
        let values: Vec<&str> = self
            .headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect();
        (!values.is_empty()).then(|| values.join(", "))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Merge `overrides` into `base`. On a name collision the override replaces
/// the existing entry entirely, including its spelling of the name.
pub fn merge_header_fields(base: &mut HeaderFields, overrides: HeaderFields) {
    for (name, value) in overrides {
        base.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        base.insert(name, value);
    }
}
