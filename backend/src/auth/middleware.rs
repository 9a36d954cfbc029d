//! Middleware for protecting routes registered in the route table.
//!
//! Each request under a protected prefix resolves a session from its bearer
//! token and runs the registered guard. How a decision becomes an HTTP
//! response depends on the configured redirect strategy:
//!
//! | Frame | Response |
//! |-------|----------|
//! | `Content` | handler runs, session available as an extension |
//! | `Redirect(path)` | `303 See Other`, `Location: path` |
//! | `Blank { pending }` | `200`, `Refresh: 0; url=pending`, empty body |
//! | `Placeholder` | `503`, `Retry-After: 1` |

use super::resolve_session;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::header::{HeaderName, AUTHORIZATION, RETRY_AFTER};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use roomly_access::Frame;

const REFRESH: HeaderName = HeaderName::from_static("refresh");

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

pub async fn guard_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(route) = state.routes.lookup(req.uri().path()).cloned() else {
        return next.run(req).await;
    };

    let session = resolve_session(&state.store, bearer_token(req.headers())).await;
    let decision = route.guard.evaluate(&session, &route.policy);
    tracing::debug!(path = %req.uri().path(), %decision, "guarded request");

    match frame_response(state.config.redirect_strategy.frame_for(decision)) {
        Some(response) => response,
        None => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
    }
}

/// Response for a non-content frame; `None` means render the content.
pub fn frame_response(frame: Frame) -> Option<Response> {
    let response = match frame {
        Frame::Content => return None,
        Frame::Redirect(path) => Redirect::to(&path).into_response(),
        Frame::Blank { pending } => {
            (StatusCode::OK, [(REFRESH, format!("0; url={pending}"))]).into_response()
        }
        Frame::Placeholder => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(RETRY_AFTER, "1")],
            "session is resolving",
        )
            .into_response(),
    };
    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc".to_string()));
        assert_eq!(bearer_token(&headers("bearer  abc ")), Some("abc".to_string()));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn frames_map_to_responses() {
        assert!(frame_response(Frame::Content).is_none());

        let response = frame_response(Frame::Redirect("/auth/login".to_string())).unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/auth/login");

        let response = frame_response(Frame::Blank {
            pending: "/agent".to_string(),
        })
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["refresh"], "0; url=/agent");

        let response = frame_response(Frame::Placeholder).unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[RETRY_AFTER], "1");
    }
}
