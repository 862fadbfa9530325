use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("HTTP {status} while loading {url}")]
    HttpStatus { status: u16, url: String },

    #[error("invalid catalog JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("{0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Best-effort text for a rejected promise or thrown JS value.
pub fn describe_js(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.to_string());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
