//! Home page, form submission and short link redirect handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::domain::entities::LinkRecord;
use crate::error::LinkError;
use crate::state::AppState;
use crate::utils::base_url::{resolve_base_url, short_url};
use crate::utils::relative_time;

/// Template for the home page.
///
/// Renders `templates/home.html`: the create form, the outcome of the last
/// submission and the "latest" and "most viewed" lists.
#[derive(Debug, Default, Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    success: bool,
    url_saved: String,
    short_url: String,
    error: bool,
    error_message: String,
    error_url: bool,
    error_alias: bool,
    url: String,
    alias: String,
    latest: Vec<LinkView>,
    most_viewed: Vec<LinkView>,
}

impl HomeTemplate {
    fn with_error(message: impl Into<String>) -> Self {
        Self {
            error: true,
            error_message: message.into(),
            ..Self::default()
        }
    }
}

/// A link as shown in the home page lists.
#[derive(Debug, PartialEq, Eq)]
pub struct LinkView {
    /// Site-relative path, e.g. `/docs`.
    alias: String,
    /// Full short URL.
    redirect: String,
    url: String,
    visits: i64,
    /// Relative creation time, e.g. `3 minutes ago`.
    created_at: String,
}

impl LinkView {
    fn from_record(record: LinkRecord, base_url: &str, now: DateTime<Utc>) -> Self {
        Self {
            redirect: short_url(base_url, &record.alias),
            alias: format!("/{}", record.alias),
            url: record.url,
            visits: record.visits,
            created_at: relative_time::from_now(record.created_at, now),
        }
    }
}

/// Form fields of the create form. Missing fields count as empty.
#[derive(Debug, Deserialize)]
pub struct CreateLinkForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alias: String,
}

/// Renders the home page.
///
/// # Endpoint
///
/// `GET /`
pub async fn home_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    render_home(&state, &headers, HomeTemplate::default()).await
}

/// Creates a short link from the home page form.
///
/// # Endpoint
///
/// `POST /` (form-encoded `url` and optional `alias`)
///
/// On failure the page is rendered again with the submitted values and the
/// offending fields flagged. An empty alias field requests a generated alias.
pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CreateLinkForm>,
) -> Response {
    let requested_alias = Some(form.alias.as_str()).filter(|alias| !alias.is_empty());

    let created = state
        .link_service
        .create_link(&form.url, requested_alias)
        .await;

    let (status, page) = match created {
        Ok(record) => {
            let base_url = resolve_base_url(&headers, state.public_base_url.as_deref());
            let page = HomeTemplate {
                success: true,
                short_url: short_url(&base_url, &record.alias),
                url_saved: record.url,
                ..HomeTemplate::default()
            };
            (StatusCode::OK, page)
        }
        Err(e) => {
            let status = status_for(&e);
            let mut page = match e {
                LinkError::Invalid(fields) => HomeTemplate {
                    error_url: fields.url,
                    error_alias: fields.alias,
                    ..HomeTemplate::default()
                },
                other => HomeTemplate::with_error(error_message(&other)),
            };
            page.url = form.url;
            page.alias = form.alias;
            (status, page)
        }
    };

    (status, render_home(&state, &headers, page).await).into_response()
}

/// Redirects a short link to its target url.
///
/// # Endpoint
///
/// `GET /{alias}`
///
/// # Response Codes
///
/// - **307 Temporary Redirect**: `Location` carries the stored url
/// - **404 Not Found**: Home page with an error message
/// - **503 Service Unavailable**: Home page with an error message
pub async fn redirect_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(alias): Path<String>,
) -> Response {
    match state.link_service.resolve_link(&alias).await {
        Ok(target) => match location_header(&target) {
            Some(location) => {
                (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response()
            }
            None => {
                tracing::error!(%alias, "Stored url cannot be used as a Location header");
                let page = HomeTemplate::with_error("Cannot redirect to the stored URL");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    render_home(&state, &headers, page).await,
                )
                    .into_response()
            }
        },
        Err(e) => {
            let page = HomeTemplate::with_error(error_message(&e));
            (status_for(&e), render_home(&state, &headers, page).await).into_response()
        }
    }
}

/// Fills in the listings and renders the page.
///
/// A failing listing is logged and shown as empty.
async fn render_home(
    state: &AppState,
    headers: &HeaderMap,
    mut page: HomeTemplate,
) -> HomeTemplate {
    let service = &state.link_service;
    let (latest, most_viewed) = tokio::join!(
        service.list_latest(state.listing_size),
        service.list_most_visited(state.listing_size),
    );

    let base_url = resolve_base_url(headers, state.public_base_url.as_deref());
    let now = Utc::now();

    page.latest = to_views(latest, "latest", &base_url, now);
    page.most_viewed = to_views(most_viewed, "most viewed", &base_url, now);
    page
}

fn to_views(
    listing: Result<Vec<LinkRecord>, LinkError>,
    name: &str,
    base_url: &str,
    now: DateTime<Utc>,
) -> Vec<LinkView> {
    match listing {
        Ok(records) => records
            .into_iter()
            .map(|record| LinkView::from_record(record, base_url, now))
            .collect(),
        Err(e) => {
            tracing::warn!(listing = name, error = %e, "Failed to load listing");
            Vec::new()
        }
    }
}

/// Builds the `Location` value for a stored url.
///
/// ASCII urls are sent as stored. Others are sent in their percent-encoded
/// serialization.
fn location_header(target: &str) -> Option<HeaderValue> {
    if target.is_ascii() {
        return HeaderValue::from_str(target).ok();
    }

    let url = Url::parse(target).ok()?;
    HeaderValue::from_str(url.as_str()).ok()
}

fn status_for(e: &LinkError) -> StatusCode {
    match e {
        LinkError::Invalid(_) => StatusCode::BAD_REQUEST,
        LinkError::AliasTaken(_) => StatusCode::CONFLICT,
        LinkError::AliasNotFound(_) => StatusCode::NOT_FOUND,
        LinkError::AliasSpaceExhausted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        LinkError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn error_message(e: &LinkError) -> String {
    match e {
        LinkError::Invalid(fields) if fields.url => "Invalid URL specified".to_string(),
        LinkError::Invalid(_) => "Invalid alias specified, cannot redirect to URL".to_string(),
        LinkError::AliasTaken(alias) => format!("Alias \"{alias}\" is already in use"),
        LinkError::AliasNotFound(alias) => format!("No URL found for alias \"{alias}\""),
        LinkError::AliasSpaceExhausted(_) => {
            "Could not generate a free alias, please try again".to_string()
        }
        LinkError::StorageUnavailable(_) => {
            "The service is temporarily unavailable, please try again later".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_link_view_from_record() {
        let now = Utc::now();
        let record = LinkRecord::new(
            1,
            "docs".to_string(),
            "https://example.com/docs".to_string(),
            4,
            now - Duration::minutes(3),
        );

        let view = LinkView::from_record(record, "http://localhost:3000/", now);

        assert_eq!(view.alias, "/docs");
        assert_eq!(view.redirect, "http://localhost:3000/docs");
        assert_eq!(view.visits, 4);
        assert_eq!(view.created_at, "3 minutes ago");
    }

    #[test]
    fn test_location_header_keeps_ascii_url_verbatim() {
        let location = location_header("https://example.com/a?b=c").unwrap();
        assert_eq!(location, "https://example.com/a?b=c");
    }

    #[test]
    fn test_location_header_encodes_non_ascii_url() {
        let location = location_header("https://example.com/café").unwrap();
        assert_eq!(location, "https://example.com/caf%C3%A9");
    }

    #[test]
    fn test_status_for_errors() {
        assert_eq!(status_for(&LinkError::invalid_url()), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&LinkError::AliasNotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&LinkError::StorageUnavailable("down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_template_renders_flags_and_values() {
        let page = HomeTemplate {
            error_alias: true,
            url: "https://example.com".to_string(),
            alias: "bad alias".to_string(),
            ..HomeTemplate::default()
        };

        let html = page.render().unwrap();

        assert!(html.contains("example.com"));
        assert!(html.contains(r#"value="bad alias" class="invalid""#));
        assert!(html.contains("Aliases may only contain"));
        assert!(!html.contains("Please enter a valid"));
    }
}
