//! Compilation options for Vascal

/// Options for one compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Log every semantic action with the operand stack depth (`trace` level)
    pub trace_actions: bool,
    /// Attach a rendering of the global symbol table to the result
    pub dump_symbols: bool,
    /// Prefix of generated temporary names (`$$<prefix><n>`)
    pub temp_prefix: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            trace_actions: false,
            dump_symbols: false,
            temp_prefix: "t".to_string(),
        }
    }
}

impl CompileOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable action tracing
    pub fn with_trace_actions(mut self, enabled: bool) -> Self {
        self.trace_actions = enabled;
        self
    }

    /// Enable or disable the symbol table dump
    pub fn with_dump_symbols(mut self, enabled: bool) -> Self {
        self.dump_symbols = enabled;
        self
    }

    /// Set the temporary name prefix
    pub fn with_temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompileOptions::default();
        assert!(!options.trace_actions);
        assert!(!options.dump_symbols);
        assert_eq!(options.temp_prefix, "t");
    }

    #[test]
    fn test_builders() {
        let options = CompileOptions::new()
            .with_trace_actions(true)
            .with_dump_symbols(true)
            .with_temp_prefix("tmp");
        assert!(options.trace_actions);
        assert!(options.dump_symbols);
        assert_eq!(options.temp_prefix, "tmp");
    }
}
