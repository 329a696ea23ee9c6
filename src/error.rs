use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("canvas must be at least 1x1, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("viewport size must be positive and finite, got {0}")]
    ViewportSize(f64),
    #[error("projection distance must be positive and finite, got {0}")]
    ProjectionDistance(f64),
    #[error("primary ray range ({near}, {far}) is empty")]
    EmptyRayRange { near: f64, far: f64 },
    #[error("shadow epsilon must be positive and finite, got {0}")]
    ShadowEpsilon(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("invalid render settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("framebuffer is {actual:?} but the canvas is {expected:?}")]
    FramebufferSize { expected: (u32, u32), actual: (u32, u32) },
    #[error("render cancelled")]
    Cancelled,
}
