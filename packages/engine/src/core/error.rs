//! Engine error type

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("WebGL context unavailable")]
    WebGlUnavailable,

    #[error("shader compile failed: {0}")]
    ShaderCompile(String),

    #[error("program link failed: {0}")]
    ProgramLink(String),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("canvas error: {0}")]
    Canvas(String),
}

impl EngineError {
    /// Errors that should trigger the Canvas2D fallback instead of disabling the field
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, EngineError::WebGlUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for EngineError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        EngineError::Canvas(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<EngineError> for wasm_bindgen::JsValue {
    fn from(err: EngineError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
