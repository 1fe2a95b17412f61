//! Error types shared by the core and its frontends.

use thiserror::Error;

/// Result type for renderer and driver operations
pub type RenderResult<T> = Result<T, HalftoneError>;

#[derive(Debug, Error)]
pub enum HalftoneError {
    /// A control value that is not a finite number
    #[error("invalid value for {param}: {value:?} is not a finite number")]
    InvalidNumber { param: &'static str, value: String },

    /// A color that is not six hex digits
    #[error("invalid color {0:?}: expected #rrggbb")]
    InvalidColor(String),

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Backend failure (shader build, texture upload, presentation)
    #[error("render error: {0}")]
    Render(String),

    /// Video source failure (device missing, permission denied, decode)
    #[error("video source error: {0}")]
    Source(String),

    #[error("invalid parameter file: {0}")]
    Json(#[from] serde_json::Error),
}

impl HalftoneError {
    pub fn render(msg: impl Into<String>) -> Self {
        HalftoneError::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let e = HalftoneError::InvalidNumber {
            param: "gamma",
            value: "abc".into(),
        };
        assert_eq!(
            e.to_string(),
            "invalid value for gamma: \"abc\" is not a finite number"
        );
        assert_eq!(
            HalftoneError::InvalidColor("#12".into()).to_string(),
            "invalid color \"#12\": expected #rrggbb"
        );
    }
}
