//! Browser glue: location fragment, fetch, clipboard, print and the
//! service worker. Everything here needs a real `window`.

use leptos::prelude::window;
use leptos::task::spawn_local;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCache, RequestInit, Response};

use crate::catalog::Catalog;
use crate::error::{describe_js, AppError, Result};
use crate::route::{navigation_target, Route};

pub fn current_fragment() -> String {
    window().location().hash().unwrap_or_default()
}

pub fn query_string() -> String {
    window().location().search().unwrap_or_default()
}

/// Writes the route's fragment unless it is already current. The browser's
/// `hashchange` event carries the change back into the app.
pub fn navigate(route: &Route) {
    let current = current_fragment();
    let Some(fragment) = navigation_target(&current, route) else {
        return;
    };
    debug!(from = %current, to = %fragment, "navigate");
    if let Err(err) = window().location().set_hash(&fragment) {
        warn!(err = %describe_js(&err), "could not update location hash");
    }
}

/// Text of `<script type="application/json" id="...">`, if present.
pub fn embedded_text(element_id: &str) -> Option<String> {
    window()
        .document()?
        .get_element_by_id(element_id)?
        .text_content()
}

pub async fn fetch_text(url: &str) -> Result<String> {
    let init = RequestInit::new();
    init.set_method("GET");
    init.set_cache(RequestCache::NoCache);
    let request = Request::new_with_str_and_init(url, &init)
        .map_err(|e| AppError::Fetch(describe_js(&e)))?;

    let response: Response = JsFuture::from(window().fetch_with_request(&request))
        .await
        .map_err(|e| AppError::Fetch(describe_js(&e)))?
        .dyn_into()
        .map_err(|_| AppError::Platform("fetch did not resolve to a Response".to_string()))?;

    if !response.ok() {
        return Err(AppError::HttpStatus {
            status: response.status(),
            url: url.to_string(),
        });
    }

    let body = response
        .text()
        .map_err(|e| AppError::Fetch(describe_js(&e)))?;
    JsFuture::from(body)
        .await
        .map_err(|e| AppError::Fetch(describe_js(&e)))?
        .as_string()
        .ok_or_else(|| AppError::Platform("response body is not text".to_string()))
}

pub async fn load_catalog(url: &str) -> Result<Catalog> {
    let text = fetch_text(url).await?;
    Catalog::from_json(&text)
}

fn navigator_has(property: &str) -> bool {
    js_sys::Reflect::get(window().navigator().as_ref(), &JsValue::from_str(property))
        .map(|value| !value.is_undefined())
        .unwrap_or(false)
}

pub async fn copy_text(text: &str) -> Result<()> {
    if !navigator_has("clipboard") {
        return Err(AppError::Clipboard(
            "navigator.clipboard is not available".to_string(),
        ));
    }
    let promise = window().navigator().clipboard().write_text(text);
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| AppError::Clipboard(describe_js(&e)))
}

pub fn print() {
    if let Err(err) = window().print() {
        warn!(err = %describe_js(&err), "print dialog unavailable");
    }
}

/// Fire-and-forget; the outcome is only logged.
pub fn register_service_worker(url: &str) {
    if !navigator_has("serviceWorker") {
        debug!("service workers unsupported");
        return;
    }
    let promise = window().navigator().service_worker().register(url);
    let url = url.to_string();
    spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(_) => debug!(%url, "service worker registered"),
            Err(err) => debug!(%url, err = %describe_js(&err), "service worker registration failed"),
        }
    });
}
