//! Networking engine that turns any `Request` into an HTTP call.
//!
//! # Design
//! A call has three stages:
//! - `build_request` resolves the descriptor into an `HttpRequest`: final
//!   URL with query string, merged headers, optional body.
//! - a `Transport` executes it on a worker thread spawned per `send`.
//! - `parse_response` classifies the outcome into the descriptor's response
//!   type plus `Pagination`, or a `SessionError`.
//!
//! Build and classify are pure, so they are tested without a network. The
//! only state shared across calls is the transport and the two providers,
//! which are read on every call and never mutated.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ErrorMessage, ResponseMetadata, SessionError, TransportError};
use crate::http::{merge_header_fields, HeaderFields, HttpMethod, HttpRequest, HttpResponse};
use crate::pagination::Pagination;
use crate::request::Request;
use crate::transport::{Transport, UreqTransport};

/// Outcome delivered to a `send` completion handler.
pub type SessionResult<T> = Result<(T, Pagination), SessionError>;

type AccessTokenProvider = dyn Fn() -> Option<AccessToken> + Send + Sync;
type HeaderFieldsProvider = dyn Fn() -> Option<HeaderFields> + Send + Sync;

/// Credential sent as `Authorization: token <access_token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// Read `GITHUB_TOKEN`. Unset or blank yields `None`.
    pub fn from_env() -> Option<Self> {
        std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .map(Self::new)
    }

    fn authorization(&self) -> String {
        format!("token {}", self.access_token)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Executes descriptors against the network.
#[derive(Clone)]
pub struct Session {
    access_token: Arc<AccessTokenProvider>,
    additional_header_fields: Arc<HeaderFieldsProvider>,
    transport: Arc<dyn Transport>,
}

impl Session {
    /// Session with no credential, no extra headers and no timeout.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Issue `request` on a worker thread and return immediately.
    ///
    /// `completion` runs exactly once, on the worker thread, with the
    /// outcome. If the request cannot be built, `completion` runs before
    /// this returns and no handle is produced.
    pub fn send<R, F>(&self, request: &R, completion: F) -> Option<TaskHandle>
    where
        R: Request,
        R::Response: Send + 'static,
        F: FnOnce(SessionResult<R::Response>) + Send + 'static,
    {
        let http_request = match self.build_request(request) {
            Ok(http_request) => http_request,
            Err(err) => {
                tracing::warn!(error = %err, "failed to build request");
                completion(Err(err));
                return None;
            }
        };

        let cancelled = Arc::new(AtomicBool::new(false));
        let thread = spawn_task(
            Arc::clone(&self.transport),
            http_request,
            Arc::clone(&cancelled),
            completion,
        );

        Some(TaskHandle { cancelled, thread })
    }

    /// Resolve `request` into the exact HTTP request that will be sent.
    pub fn build_request<R: Request>(&self, request: &R) -> Result<HttpRequest, SessionError> {
        let url = build_url(request)?;

        let body = match request.method() {
            HttpMethod::Post => request.body(),
            HttpMethod::Get => None,
        };

        let mut headers = HeaderFields::new();
        if body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        merge_header_fields(&mut headers, request.header_fields());
        if let Some(additional) = (self.additional_header_fields)() {
            merge_header_fields(&mut headers, additional);
        }
        if let Some(token) = (self.access_token)() {
            merge_header_fields(
                &mut headers,
                HeaderFields::from([("Authorization".to_string(), token.authorization())]),
            );
        }

        Ok(HttpRequest {
            method: request.method(),
            url,
            headers,
            body,
        })
    }

    /// Classify a transport outcome into a decoded value or an error.
    pub fn parse_response<T>(response: Option<HttpResponse>) -> SessionResult<T>
    where
        T: DeserializeOwned,
    {
        let response = response.ok_or(SessionError::NoResponse)?;

        if response.body.is_empty() {
            return Err(SessionError::NoData(ResponseMetadata::from(&response)));
        }

        if !response.is_success() {
            let message = serde_json::from_slice::<ErrorMessage>(&response.body).ok();
            return Err(SessionError::UnacceptableStatusCode {
                code: response.status,
                message,
            });
        }

        let value = serde_json::from_slice(&response.body).map_err(SessionError::Decoding)?;
        let link = response.header_all("Link");
        let pagination = Pagination::from_optional_header(link.as_deref());
        Ok((value, pagination))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

/// Configures a `Session`.
#[derive(Default)]
pub struct SessionBuilder {
    access_token: Option<Arc<AccessTokenProvider>>,
    additional_header_fields: Option<Arc<HeaderFieldsProvider>>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl SessionBuilder {
    /// Credential read on every call.
    pub fn access_token<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Option<AccessToken> + Send + Sync + 'static,
    {
        self.access_token = Some(Arc::new(provider));
        self
    }

    /// Headers layered over each descriptor's own, read on every call.
    pub fn additional_header_fields<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Option<HeaderFields> + Send + Sync + 'static,
    {
        self.additional_header_fields = Some(Arc::new(provider));
        self
    }

    /// Timeout for the default transport. Ignored when `transport` is set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn transport(mut self, transport: impl Transport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Session {
        let timeout = self.timeout;
        Session {
            access_token: self
                .access_token
                .unwrap_or_else(|| Arc::new(|| None::<AccessToken>)),
            additional_header_fields: self
                .additional_header_fields
                .unwrap_or_else(|| Arc::new(|| None::<HeaderFields>)),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(UreqTransport::new(timeout))),
        }
    }
}

/// Handle to one in-flight `send`.
#[derive(Debug)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl TaskHandle {
    /// Ask the task to stop. Best-effort: an exchange already on the wire
    /// still runs to the end, but its result is replaced by
    /// `TransportError::Cancelled`. The completion still fires exactly once.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// True once the completion handler has returned.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the completion handler has returned.
    pub fn join(self) -> thread::Result<()> {
        self.thread.join()
    }
}

/// Run one exchange on its own thread and hand the outcome to `completion`.
fn spawn_task<T, F>(
    transport: Arc<dyn Transport>,
    request: HttpRequest,
    cancelled: Arc<AtomicBool>,
    completion: F,
) -> JoinHandle<()>
where
    T: DeserializeOwned + Send + 'static,
    F: FnOnce(SessionResult<T>) + Send + 'static,
{
    thread::spawn(move || {
        let outcome = if cancelled.load(Ordering::SeqCst) {
            Err(TransportError::Cancelled)
        } else {
            tracing::debug!(
                method = request.method.as_str(),
                url = %request.url,
                "dispatching request"
            );
            panic::catch_unwind(AssertUnwindSafe(|| transport.execute(&request)))
                .unwrap_or_else(|payload| Err(TransportError::failed(panic_message(&*payload))))
        };
        let outcome = match outcome {
            Ok(_) if cancelled.load(Ordering::SeqCst) => Err(TransportError::Cancelled),
            other => other,
        };

        let result = match outcome {
            Ok(response) => Session::parse_response::<T>(response),
            Err(err) => Err(SessionError::Transport(err)),
        };
        match &result {
            Ok(_) => tracing::debug!(url = %request.url, "request succeeded"),
            Err(err) => tracing::warn!(url = %request.url, error = %err, "request failed"),
        }
        completion(result);
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic");
    format!("transport panicked: {detail}")
}

/// Steps 1-4: compose, decompose, append query items, re-serialize.
fn build_url<R: Request>(request: &R) -> Result<Url, SessionError> {
    let composed = append_path(request.base_url(), request.path());

    let mut components = match Url::parse(&composed) {
        Ok(url) if url.has_host() && !url.cannot_be_a_base() => url,
        _ => return Err(SessionError::FailedToBuildRequestComponents(composed)),
    };

    if let Some(parameters) = request.query_parameters() {
        let mut query = components.query_pairs_mut();
        query.clear();
        for (name, value) in parameters {
            if let Some(value) = value {
                query.append_pair(&name, &value);
            }
        }
    }

    match components.scheme() {
        "http" | "https" => Ok(components),
        _ => Err(SessionError::FailedToBuildFinalUrl(components)),
    }
}

/// Join `path` onto `base` as a path component with exactly one separator
/// at the seam. Slashes elsewhere are left alone.
fn append_path(base: &str, path: &str) -> String {
    let mut url = base.to_string();
    match (url.ends_with('/'), path.starts_with('/')) {
        (true, true) => {
            url.pop();
        }
        (false, false) if !path.is_empty() => url.push('/'),
        _ => {}
    }
    url.push_str(path);
    url
}
