use std::fmt;

pub type BackgroundResult<T> = Result<T, BackgroundError>;

/// Shader pipeline stage, reported with compile failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failures of a single background instance. None of these ever escape the
/// instance boundary: callers log them and degrade to "no background".
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BackgroundError {
    #[error("surface init error: {0}")]
    SurfaceInit(String),

    #[error("{stage} shader compile error: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader link error: {log}")]
    ShaderLink { log: String },

    #[error("resize handling error: {0}")]
    ResizeHandling(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("scheduler error: {0}")]
    Scheduler(String),
}

impl BackgroundError {
    pub fn surface_init(msg: impl Into<String>) -> Self {
        Self::SurfaceInit(msg.into())
    }

    pub fn compile(stage: ShaderStage, log: impl Into<String>) -> Self {
        Self::ShaderCompile {
            stage,
            log: log.into(),
        }
    }

    pub fn link(log: impl Into<String>) -> Self {
        Self::ShaderLink { log: log.into() }
    }

    pub fn resize(msg: impl Into<String>) -> Self {
        Self::ResizeHandling(msg.into())
    }

    pub fn scheduler(msg: impl Into<String>) -> Self {
        Self::Scheduler(msg.into())
    }

    /// Whether the instance can keep animating after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ResizeHandling(_))
    }
}

impl From<serde_json::Error> for BackgroundError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(BackgroundError::surface_init("x")
            .to_string()
            .contains("surface init error:"));
        assert!(BackgroundError::link("x")
            .to_string()
            .contains("shader link error:"));
        assert!(BackgroundError::resize("x")
            .to_string()
            .contains("resize handling error:"));
    }

    #[test]
    fn compile_error_names_the_stage() {
        let err = BackgroundError::compile(ShaderStage::Fragment, "0:12: syntax error");
        assert_eq!(
            err.to_string(),
            "fragment shader compile error: 0:12: syntax error"
        );
    }

    #[test]
    fn only_resize_errors_are_transient() {
        assert!(BackgroundError::resize("nan").is_transient());
        assert!(!BackgroundError::surface_init("no webgl2").is_transient());
        assert!(!BackgroundError::link("x").is_transient());
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err: BackgroundError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, BackgroundError::Config(_)));
    }
}
