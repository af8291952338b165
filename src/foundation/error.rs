pub type DimensionsResult<T> = Result<T, DimensionsError>;

/// Error kinds surfaced by the session, the capture boundary and the render loop.
///
/// `Acquisition` and `ModelLoad` are fatal to starting a session. `Capture` is reported through
/// status and the session keeps animating. `RenderTick` is logged by the scheduler, which then
/// proceeds to the next tick.
#[derive(thiserror::Error, Debug)]
pub enum DimensionsError {
    #[error("acquisition error: {0}")]
    Acquisition(String),

    #[error("model load error: {0}")]
    ModelLoad(String),

    #[error("capture error: {0}")]
    Capture(String),

    #[error("render tick error: {0}")]
    RenderTick(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DimensionsError {
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition(msg.into())
    }

    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    pub fn render_tick(msg: impl Into<String>) -> Self {
        Self::RenderTick(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error must abort session start-up.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Acquisition(_) | Self::ModelLoad(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
