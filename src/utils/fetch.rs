//! Network submission utilities with timeout support.
//!
//! The storage core itself never fetches; only checkout submission goes to
//! the network, through [`post_json`]. Requests race a timeout so a sleeping
//! backend surfaces as [`FetchError::Timeout`] instead of hanging the form.

use serde::{Serialize, de::DeserializeOwned};

use crate::core::error::FetchError;

#[cfg(target_arch = "wasm32")]
use {
    crate::config::ORDER_TIMEOUT_MS,
    js_sys::{Array, Promise},
    wasm_bindgen::{JsCast, JsValue},
    wasm_bindgen_futures::JsFuture,
    web_sys::{Headers, Request, RequestInit, RequestMode, Response},
};

// =============================================================================
// Promise Racing
// =============================================================================

/// Result of a promise race with timeout.
#[cfg(target_arch = "wasm32")]
#[derive(Debug)]
pub enum RaceResult {
    /// The promise completed before timeout.
    Completed(JsValue),
    /// Timeout occurred before promise completed.
    TimedOut,
    /// Promise rejected with an error.
    Error(String),
}

/// Race a promise against a timeout using `Promise.race`.
///
/// The timeout promise resolves to `undefined`, which the fetch path can
/// distinguish from any real `Response`.
#[cfg(target_arch = "wasm32")]
pub async fn race_with_timeout(promise: Promise, timeout_ms: i32) -> RaceResult {
    let Some(window) = web_sys::window() else {
        return RaceResult::Error("Window not available".to_string());
    };

    let timeout_promise = Promise::new(&mut |resolve, _| {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout_ms);
    });

    let race_array = Array::new();
    race_array.push(&promise);
    race_array.push(&timeout_promise);

    match JsFuture::from(Promise::race(&race_array)).await {
        Ok(result) => {
            if result.is_undefined() {
                RaceResult::TimedOut
            } else {
                RaceResult::Completed(result)
            }
        }
        Err(e) => RaceResult::Error(e.as_string().unwrap_or_else(|| "Unknown error".to_string())),
    }
}

// =============================================================================
// JSON Submission
// =============================================================================

/// POST a JSON body and parse a JSON response.
///
/// Off-wasm there is no fetch implementation; callers get
/// [`FetchError::NoWindow`], which checkout surfaces like any other network
/// failure.
pub async fn post_json<B, R>(url: &str, body: &B) -> Result<R, FetchError>
where
    B: Serialize,
    R: DeserializeOwned,
{
    #[cfg(target_arch = "wasm32")]
    {
        let text = post_json_text(url, body).await?;
        serde_json::from_str(&text).map_err(|e| FetchError::JsonParseError(e.to_string()))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (url, body);
        Err(FetchError::NoWindow)
    }
}

#[cfg(target_arch = "wasm32")]
async fn post_json_text<B: Serialize>(url: &str, body: &B) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or(FetchError::NoWindow)?;

    let payload =
        serde_json::to_string(body).map_err(|e| FetchError::JsonParseError(e.to_string()))?;

    let headers = Headers::new().map_err(|_| FetchError::RequestCreationFailed)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|_| FetchError::RequestCreationFailed)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_headers(&headers);
    opts.set_body(&JsValue::from_str(&payload));

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|_| FetchError::RequestCreationFailed)?;

    let fetch_promise = window.fetch_with_request(&request);

    match race_with_timeout(fetch_promise, ORDER_TIMEOUT_MS).await {
        RaceResult::TimedOut => Err(FetchError::Timeout),
        RaceResult::Error(msg) => Err(FetchError::NetworkError(msg)),
        RaceResult::Completed(result) => {
            let resp: Response = result.dyn_into().map_err(|_| FetchError::InvalidContent)?;

            if !resp.ok() {
                return Err(FetchError::HttpError(resp.status()));
            }

            let text = JsFuture::from(resp.text().map_err(|_| FetchError::ResponseReadFailed)?)
                .await
                .map_err(|_| FetchError::ResponseReadFailed)?;

            text.as_string().ok_or(FetchError::InvalidContent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Body {
        value: u32,
    }

    #[tokio::test]
    async fn test_post_json_off_wasm_reports_no_window() {
        let result: Result<serde_json::Value, FetchError> =
            post_json("/api/orders", &Body { value: 1 }).await;
        assert!(matches!(result, Err(FetchError::NoWindow)));
    }
}
