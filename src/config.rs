//! Frame graph configuration.

/// Configuration for a [`FrameGraph`](crate::FrameGraph).
///
/// # Example
///
/// ```
/// use redlilium_frame_graph::FrameGraphConfig;
///
/// let config = FrameGraphConfig::new("shadows")
///     .with_culling(false)
///     .with_timeline_logging(true);
/// assert_eq!(config.label, "shadows");
/// assert!(!config.culling);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameGraphConfig {
    /// Graph name used in logs and exports.
    pub label: String,
    /// Remove tasks and resources nothing observable depends on.
    ///
    /// With culling disabled every task is executed; resource lifetimes are
    /// still computed.
    pub culling: bool,
    /// Check the timeline invariants after every build and panic on violation.
    pub validate: bool,
    /// Log the timeline at `debug` level after every build.
    pub log_timeline: bool,
}

impl FrameGraphConfig {
    /// Create a configuration with the given label and default settings.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Set the graph label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Enable or disable culling.
    pub fn with_culling(mut self, culling: bool) -> Self {
        self.culling = culling;
        self
    }

    /// Enable or disable post-build timeline validation.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Enable or disable timeline logging after build.
    pub fn with_timeline_logging(mut self, log_timeline: bool) -> Self {
        self.log_timeline = log_timeline;
        self
    }
}

impl Default for FrameGraphConfig {
    fn default() -> Self {
        Self {
            label: "frame".to_string(),
            culling: true,
            validate: cfg!(debug_assertions),
            log_timeline: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FrameGraphConfig::default();
        assert_eq!(config.label, "frame");
        assert!(config.culling);
        assert_eq!(config.validate, cfg!(debug_assertions));
        assert!(!config.log_timeline);
    }

    #[test]
    fn test_builder() {
        let config = FrameGraphConfig::new("main")
            .with_label("post")
            .with_validation(true)
            .with_culling(false);
        assert_eq!(config.label, "post");
        assert!(config.validate);
        assert!(!config.culling);
    }
}
