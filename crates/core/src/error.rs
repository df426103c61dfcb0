/// Result of any fallible visualiser operation.
pub type Result<T> = std::result::Result<T, SortVizError>;

/// Why a container, playback or configuration request was refused.
///
/// Every variant is raised by a boundary check before any container is
/// mutated. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum SortVizError {
    /// Container length or value interval cannot produce a canvas.
    #[error("invalid range: {len} values in [{low}, {high}]")]
    InvalidRange { len: usize, low: i64, high: i64 },
    /// Speed must be positive and give a hold that fits in a `Duration`.
    #[error("invalid speed `{0}`, expected a positive number")]
    InvalidSpeed(f64),
    /// The requested algorithm is not part of the registry.
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),
    /// The renderer cannot display the requested colour token.
    #[error("colour `{0}` is not supported by the renderer")]
    UnsupportedColor(String),
    /// The session input lock is held by a running playback.
    #[error("playback in progress, input is locked")]
    PlaybackInProgress,
    /// Reading a configuration file failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl SortVizError {
    /// Shorthand for an [`SortVizError::InvalidRange`] built from its parts.
    pub fn invalid_range(len: usize, low: i64, high: i64) -> Self {
        Self::InvalidRange { len, low, high }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = SortVizError::UnknownAlgorithm("bubble sort".to_string());
        assert!(format!("{err}").contains("bubble sort"));

        let err = SortVizError::invalid_range(0, 5, 1);
        assert_eq!(format!("{err}"), "invalid range: 0 values in [5, 1]");
    }
}
