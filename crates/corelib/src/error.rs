use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },
    #[error("Camera position and target coincide")]
    DegenerateDirection,
}

pub type CoreResult<T> = Result<T, CoreError>;
