/// File extension used for partials and template files when none is given.
pub const DEFAULT_EXTENSION: &str = "mustache";

/// Default bound on nested partial inclusion.
pub const DEFAULT_MAX_PARTIAL_DEPTH: usize = 32;

/// Render-time settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// How deep partials may include other partials before rendering fails
    /// with `PartialDepthExceeded`. Guards against self-including partials.
    pub max_partial_depth: usize,
    /// Extension (without the dot) appended to partial names by `render_file`.
    pub partial_extension: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_partial_depth: DEFAULT_MAX_PARTIAL_DEPTH,
            partial_extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_max_partial_depth(mut self, depth: usize) -> Self {
        self.max_partial_depth = depth;
        self
    }

    pub fn with_partial_extension(mut self, extension: impl Into<String>) -> Self {
        self.partial_extension = extension.into();
        self
    }
}
