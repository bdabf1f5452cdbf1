//! Remote layout over `fetch`.

use futures::future::LocalBoxFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Request, RequestInit, RequestMode, Response};

use crate::error::LayoutError;
use crate::layout::remote::{decode_response, LayoutTransport, RemoteLayoutRequest, RemoteLayoutResponse};

/// POSTs layout requests as JSON to a fixed endpoint.
///
/// The request is tied to an `AbortController`: dropping the future returned
/// by [`LayoutTransport::send`] aborts the HTTP request.
#[derive(Debug, Clone)]
pub struct FetchTransport {
    endpoint: String,
}

impl FetchTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Aborts the fetch it guards when dropped.
struct AbortOnDrop(AbortController);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn transport_error(context: &str, err: JsValue) -> LayoutError {
    LayoutError::Transport(format!("{context}: {err:?}"))
}

async fn post_json(endpoint: String, body: String) -> Result<RemoteLayoutResponse, LayoutError> {
    let controller = AbortController::new().map_err(|e| transport_error("abort controller", e))?;
    let _abort = AbortOnDrop(controller.clone());

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));
    opts.set_signal(Some(&controller.signal()));

    let request = Request::new_with_str_and_init(&endpoint, &opts)
        .map_err(|e| transport_error("request error", e))?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|e| transport_error("header error", e))?;

    let window = web_sys::window().ok_or_else(|| LayoutError::Transport("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| transport_error("fetch error", e))?
        .dyn_into()
        .map_err(|_| LayoutError::Transport("response is not a Response".into()))?;

    if !response.ok() {
        return Err(LayoutError::Status(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(|e| transport_error("body error", e))?)
        .await
        .map_err(|e| transport_error("body error", e))?;
    let text = text
        .as_string()
        .ok_or_else(|| LayoutError::Malformed("body is not text".into()))?;
    decode_response(&text)
}

impl LayoutTransport for FetchTransport {
    fn send(
        &self,
        request: &RemoteLayoutRequest,
    ) -> LocalBoxFuture<'static, Result<RemoteLayoutResponse, LayoutError>> {
        let endpoint = self.endpoint.clone();
        let body = serde_json::to_string(request);
        Box::pin(async move {
            let body = body.map_err(|e| LayoutError::Transport(format!("encode error: {e}")))?;
            post_json(endpoint, body).await
        })
    }
}
