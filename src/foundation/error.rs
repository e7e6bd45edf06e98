pub type CrossfadeResult<T> = Result<T, CrossfadeError>;

/// Errors produced while setting up or running a crossfade.
///
/// Every variant except [`CrossfadeError::Write`] is a setup error: it aborts the whole run
/// before any frame work begins. `Write` is reported per frame and never stops a unit.
#[derive(thiserror::Error, Debug)]
pub enum CrossfadeError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("load error: {0}")]
    Load(String),

    #[error(
        "size mismatch: color image is {color_width}x{color_height}, \
         second image is {other_width}x{other_height}"
    )]
    SizeMismatch {
        color_width: u32,
        color_height: u32,
        other_width: u32,
        other_height: u32,
    },

    #[error("allocation error: {0}")]
    Allocation(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("coordination error: {0}")]
    Coordination(String),

    #[error("serialization error: {0}")]
    Serde(String),
}

impl CrossfadeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    pub fn coordination(msg: impl Into<String>) -> Self {
        Self::Coordination(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
