//! JSON requests over the browser `fetch` API.
//!
//! Each request races a timer of `FETCH_TIMEOUT_MS`. The timer is cancelled
//! as soon as the race settles, whichever side won.

use js_sys::{Array, Promise};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response, Window};

use crate::config::FETCH_TIMEOUT_MS;
use crate::core::error::FetchError;
use crate::utils::dom;

/// Pending `setTimeout`, cleared on drop.
struct Timer {
    window: Window,
    handle: i32,
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.window.clear_timeout_with_handle(self.handle);
    }
}

/// Await `promise`, giving up after `timeout_ms`.
async fn settle_within(
    window: &Window,
    promise: Promise,
    timeout_ms: i32,
) -> Result<JsValue, FetchError> {
    let mut handle = None;
    // Resolves to undefined
    let deadline = Promise::new(&mut |resolve, _| {
        handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout_ms)
            .ok();
    });
    let _timer = handle.map(|handle| Timer {
        window: window.clone(),
        handle,
    });

    match JsFuture::from(Promise::race(&Array::of2(&promise, &deadline))).await {
        Ok(value) if value.is_undefined() => Err(FetchError::Timeout),
        Ok(value) => Ok(value),
        Err(err) => Err(FetchError::NetworkError(describe(&err))),
    }
}

fn describe(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// GET `url` and decode the JSON body.
pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    let text = send("GET", url, None).await?;
    serde_json::from_str(&text).map_err(|e| FetchError::JsonParseError(e.to_string()))
}

/// POST `body` as JSON to `url`. The response body is ignored.
pub async fn post_json<B: Serialize + ?Sized>(url: &str, body: &B) -> Result<(), FetchError> {
    let body = serde_json::to_string(body).map_err(|_| FetchError::RequestCreationFailed)?;
    send("POST", url, Some(&body)).await.map(|_| ())
}

/// Send a request and return the response text of a 2xx reply.
async fn send(method: &str, url: &str, body: Option<&str>) -> Result<String, FetchError> {
    let window = dom::window().ok_or(FetchError::NoWindow)?;

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|_| FetchError::RequestCreationFailed)?;
    let headers = request.headers();
    headers
        .set("Accept", "application/json")
        .map_err(|_| FetchError::RequestCreationFailed)?;
    if body.is_some() {
        headers
            .set("Content-Type", "application/json")
            .map_err(|_| FetchError::RequestCreationFailed)?;
    }

    let pending = window.fetch_with_request(&request);
    let response: Response = settle_within(&window, pending, FETCH_TIMEOUT_MS)
        .await?
        .dyn_into()
        .map_err(|_| FetchError::InvalidContent)?;
    if !response.ok() {
        return Err(FetchError::HttpError(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(|_| FetchError::ResponseReadFailed)?)
        .await
        .map_err(|_| FetchError::ResponseReadFailed)?;
    text.as_string().ok_or(FetchError::InvalidContent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_requests_fail_without_window() {
        let get = fetch_json::<serde_json::Value>("/api/docs/tree").await;
        assert_eq!(get, Err(FetchError::NoWindow));

        let post = post_json("/api/feedback", &json!({ "content": "hi" })).await;
        assert_eq!(post, Err(FetchError::NoWindow));
    }
}
