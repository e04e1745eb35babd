//! Structured error types for imgcut.
//!
//! Every fallible operation in the crate returns these instead of
//! `Result<T, String>`.

/// All errors that can occur while editing a grid or generating output.
#[derive(Debug, thiserror::Error)]
pub enum ImgcutError {
    /// No source image has been loaded yet.
    #[error("No image loaded")]
    NoImage,

    /// Image decoding or encoding failed.
    #[error("Image codec: {0}")]
    Image(#[from] image::ImageError),

    /// A mutation requires a non-empty selection.
    #[error("No cells selected")]
    EmptySelection,

    /// The selected cells do not form a solid rectangle.
    #[error("Merge requires a solid rectangular selection")]
    MergeNotRectangular,

    /// A link URL failed validation.
    #[error("Invalid link URL: {0}")]
    InvalidUrl(String),

    /// Output generation was requested while a previous run is in flight.
    #[error("Generation already in progress")]
    Busy,

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ImgcutError>;

impl From<String> for ImgcutError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for ImgcutError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<ImgcutError> for wasm_bindgen::JsValue {
    fn from(e: ImgcutError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
