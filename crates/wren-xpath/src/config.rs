//! Evaluation settings.

/// Settings passed to the compiler and evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XPathConfig {
    /// Emit a `tracing` debug event for every compiled operation and every
    /// evaluated step.
    pub debug: bool,
    /// Look compiled expressions up in the shared [`ExpressionCache`](crate::ExpressionCache).
    pub use_cache: bool,
}

impl XPathConfig {
    /// Return a copy with step tracing switched on or off.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Return a copy with the shared cache switched on or off.
    #[must_use]
    pub const fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }
}

impl Default for XPathConfig {
    fn default() -> Self {
        Self {
            debug: false,
            use_cache: true,
        }
    }
}
