use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no global window")]
    WindowUnavailable,
    #[error("no canvas element with id '{0}'")]
    SurfaceUnavailable(String),
    #[error("no toggle element with id '{0}'")]
    ToggleUnavailable(String),
    #[error("canvas has no 2d rendering context")]
    ContextUnavailable,
    #[error("draw call failed: {0}")]
    Draw(String),
    #[error("dom call failed: {0}")]
    Dom(String),
}

impl EngineError {
    pub(crate) fn draw(err: JsValue) -> Self {
        EngineError::Draw(format!("{:?}", err))
    }

    pub(crate) fn dom(err: JsValue) -> Self {
        EngineError::Dom(format!("{:?}", err))
    }
}

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> JsValue {
        js_sys::Error::new(&err.to_string()).into()
    }
}
