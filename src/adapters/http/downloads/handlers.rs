//! HTTP handlers for installer downloads.

use axum::extract::{Path, State};
use axum::http::header::{LOCATION, REFERER, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::{DownloadError, ResolveDownloadCommand};

use super::super::state::AppState;

/// GET /api/download/:platform
///
/// Redirects with `302 Found`. Failures are plain-text bodies.
pub async fn download(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    headers: HeaderMap,
) -> Response {
    let cmd = ResolveDownloadCommand {
        platform,
        user_agent: header_string(&headers, USER_AGENT),
        referer: header_string(&headers, REFERER),
    };

    match state.download_handler().handle(cmd).await {
        Ok(resolved) => (StatusCode::FOUND, [(LOCATION, resolved.url)]).into_response(),
        Err(err) => download_error(err),
    }
}

fn header_string(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn download_error(err: DownloadError) -> Response {
    let status = match err {
        DownloadError::UnsupportedPlatform => StatusCode::BAD_REQUEST,
        DownloadError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::release::Platform;

    #[test]
    fn unsupported_platform_is_400_plain_text() {
        let response = download_error(DownloadError::UnsupportedPlatform);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_url_is_500() {
        let response = download_error(DownloadError::NotConfigured(Platform::Linux));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
