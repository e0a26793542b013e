//! Form values merged from the query string and an urlencoded body.
//!
//! Body fields are read only for POST, PUT and PATCH with an
//! `application/x-www-form-urlencoded` content type; any other body is
//! ignored. Body values take precedence over query values, and the first
//! value of a repeated key wins. A bad `%` escape or a `;` separator in
//! either source rejects the whole request with a 500.

use std::collections::HashMap;

use axum::body::to_bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::warn;

/// Largest urlencoded body read into memory.
const MAX_FORM_BYTES: usize = 10 << 20;

const URLENCODED: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Error)]
#[error("{0}")]
pub struct FormError(String);

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "form parse failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0).into_response()
    }
}

/// Parsed form fields. Missing fields read as the empty string.
#[derive(Debug, Default)]
pub struct FormValues(HashMap<String, String>);

impl FormValues {
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or_default()
    }

    /// Add the pairs of `raw` to `self`, keeping values already present.
    fn extend_from(&mut self, raw: &[u8]) -> Result<(), FormError> {
        check_escapes(raw)?;
        for (key, value) in url::form_urlencoded::parse(raw) {
            self.0
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Ok(())
    }
}

/// Reject malformed `%XX` escapes and `;` separators.
fn check_escapes(raw: &[u8]) -> Result<(), FormError> {
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'%' => {
                let valid = raw
                    .get(i + 1..i + 3)
                    .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
                if !valid {
                    let end = (i + 3).min(raw.len());
                    return Err(FormError(format!(
                        "invalid URL escape {:?}",
                        String::from_utf8_lossy(&raw[i..end])
                    )));
                }
                i += 3;
            }
            b';' => return Err(FormError("invalid semicolon separator in query".into())),
            _ => i += 1,
        }
    }
    Ok(())
}

fn is_urlencoded(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(URLENCODED))
}

impl<S> FromRequest<S> for FormValues
where
    S: Send + Sync,
{
    type Rejection = FormError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let mut values = FormValues::default();
        let query = req.uri().query().map(str::to_owned);

        let method = req.method();
        let reads_body = (method == Method::POST || method == Method::PUT || method == Method::PATCH)
            && is_urlencoded(&req);
        if reads_body {
            let body = to_bytes(req.into_body(), MAX_FORM_BYTES)
                .await
                .map_err(|e| FormError(format!("failed to read form body: {e}")))?;
            values.extend_from(&body)?;
        }

        if let Some(query) = query {
            values.extend_from(query.as_bytes())?;
        }

        Ok(values)
    }
}
