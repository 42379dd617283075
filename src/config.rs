/// Limits applied by the reading backends to untrusted input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReaderConfig {
    /// Maximum container nesting depth.
    pub max_depth: usize,
    /// Maximum element count of a single array, map or object.
    pub max_len: usize,
}

impl ReaderConfig {
    pub const DEFAULT: ReaderConfig = ReaderConfig {
        max_depth: 512,
        max_len: u32::MAX as usize,
    };

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
