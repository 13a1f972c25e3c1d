pub type StrataResult<T> = Result<T, StrataError>;

#[derive(thiserror::Error, Debug)]
pub enum StrataError {
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("unsupported compression method {0} (only uncompressed BMP is supported)")]
    UnsupportedCompression(u32),

    #[error("unsupported bit depth {0} (only 24bpp BMP is supported)")]
    UnsupportedBitDepth(u16),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("layer not found: {0}")]
    LayerNotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StrataError {
    pub fn malformed_header(msg: impl Into<String>) -> Self {
        Self::MalformedHeader(msg.into())
    }

    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    pub fn layer_not_found(msg: impl Into<String>) -> Self {
        Self::LayerNotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            StrataError::malformed_header("x")
                .to_string()
                .contains("malformed header:")
        );
        assert!(
            StrataError::UnsupportedCompression(1)
                .to_string()
                .contains("compression method 1")
        );
        assert!(
            StrataError::UnsupportedBitDepth(8)
                .to_string()
                .contains("bit depth 8")
        );
        assert!(
            StrataError::dimension_mismatch("x")
                .to_string()
                .contains("dimension mismatch:")
        );
        assert!(
            StrataError::layer_not_found("x")
                .to_string()
                .contains("layer not found:")
        );
        assert!(
            StrataError::validation("x")
                .to_string()
                .contains("validation error:")
        );
    }

    #[test]
    fn io_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = StrataError::from(base);
        assert!(err.to_string().contains("boom"));
    }
}
