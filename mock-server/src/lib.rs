use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

const DOCUMENTATION_URL: &str = "https://docs.github.com/rest/search/search#search-users";
const DEFAULT_PER_PAGE: usize = 30;
const MAX_PER_PAGE: usize = 100;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub id: u64,
    pub node_id: String,
    pub avatar_url: String,
    pub gravatar_id: String,
    pub url: String,
    pub received_events_url: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip)]
    pub followers: u32,
    #[serde(skip)]
    pub repositories: u32,
    #[serde(skip)]
    pub joined: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub total_count: usize,
    pub incomplete_results: bool,
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub documentation_url: String,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

pub type Db = Arc<Vec<User>>;

/// Directory of 45 `tom*` accounts plus a few others.
pub fn seed_users() -> Vec<User> {
    let logins = (0..45)
        .map(|i| format!("tom{i:02}"))
        .chain(["alice", "bob", "carol"].map(String::from));
    logins
        .enumerate()
        .map(|(i, login)| {
            let id = 1000 + i as u64;
            User {
                node_id: format!("MDQ6VXNlcj{id}"),
                avatar_url: format!("https://avatars.example.com/u/{id}"),
                gravatar_id: String::new(),
                url: format!("https://api.example.com/users/{login}"),
                received_events_url: format!("https://api.example.com/users/{login}/received_events"),
                kind: "User".to_string(),
                followers: (i as u32 * 37) % 101,
                repositories: (i as u32 * 13) % 29,
                joined: i as u32,
                login,
                id,
            }
        })
        .collect()
}

pub fn app() -> Router {
    app_with_users(seed_users())
}

pub fn app_with_users(users: Vec<User>) -> Router {
    let db: Db = Arc::new(users);
    Router::new()
        .route("/search/users", get(search_users))
        .route("/echo/headers", get(echo_headers).post(echo_headers))
        .route("/no-content", get(no_content))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn search_users(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return validation_failed();
    }

    let mut matches: Vec<User> = db
        .iter()
        .filter(|user| user.login.to_lowercase().contains(&query.to_lowercase()))
        .cloned()
        .collect();

    match params.sort.as_deref() {
        None => {}
        Some("followers") => matches.sort_by_key(|u| u.followers),
        Some("repositories") => matches.sort_by_key(|u| u.repositories),
        Some("joined") => matches.sort_by_key(|u| u.joined),
        Some(_) => return validation_failed(),
    }
    match params.order.as_deref() {
        None | Some("desc") if params.sort.is_some() => matches.reverse(),
        None | Some("desc") | Some("asc") => {}
        Some(_) => return validation_failed(),
    }

    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let total_count = matches.len();
    let last_page = total_count.div_ceil(per_page).max(1);
    let page = params.page.unwrap_or(1).clamp(1, last_page + 1);

    let items = matches
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    let mut response_headers = HeaderMap::new();
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let link = link_header(host, &params, query, per_page, page, last_page);
    if let Some(value) = link.and_then(|l| HeaderValue::from_str(&l).ok()) {
        response_headers.insert(header::LINK, value);
    }

    let body = SearchResults {
        total_count,
        incomplete_results: false,
        items,
    };
    (response_headers, Json(body)).into_response()
}

/// GitHub-style `Link` header: `next`/`last` while pages remain ahead,
/// `first`/`prev` once past page one.
fn link_header(
    host: &str,
    params: &SearchParams,
    query: &str,
    per_page: usize,
    page: usize,
    last_page: usize,
) -> Option<String> {
    let page_url = |n: usize| {
        let mut qs = url::form_urlencoded::Serializer::new(String::new());
        qs.append_pair("q", query);
        if let Some(sort) = &params.sort {
            qs.append_pair("sort", sort);
        }
        if let Some(order) = &params.order {
            qs.append_pair("order", order);
        }
        qs.append_pair("per_page", &per_page.to_string());
        qs.append_pair("page", &n.to_string());
        format!("http://{host}/search/users?{}", qs.finish())
    };

    let mut links = Vec::new();
    if page < last_page {
        links.push(format!("<{}>; rel=\"next\"", page_url(page + 1)));
        links.push(format!("<{}>; rel=\"last\"", page_url(last_page)));
    }
    if page > 1 {
        links.push(format!("<{}>; rel=\"first\"", page_url(1)));
        links.push(format!("<{}>; rel=\"prev\"", page_url((page - 1).min(last_page))));
    }
    (!links.is_empty()).then(|| links.join(", "))
}

fn validation_failed() -> Response {
    let body = ErrorBody {
        message: "Validation Failed".to_string(),
        documentation_url: DOCUMENTATION_URL.to_string(),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

/// Echo request headers back as a JSON object with lowercase names.
async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let echoed = headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();
    Json(echoed)
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}
