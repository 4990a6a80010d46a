//! Configuration module for reglex
//! Compile-time limits are generated from TOML by build.rs

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{LexerPreferences, LoggingPreferences, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("REGLEX_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("REGLEX_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time::{buffering, compiler};

    #[test]
    fn test_generated_limits_are_consistent() {
        assert!(buffering::MIN_CHUNK_SIZE >= 2);
        assert!(buffering::DEFAULT_CHUNK_SIZE >= buffering::MIN_CHUNK_SIZE);
        assert!(buffering::MAX_TOKEN_LENGTH >= buffering::DEFAULT_CHUNK_SIZE);
        assert!(compiler::MAX_RULE_DEPTH > 0);
    }

    #[test]
    fn test_source_info_mentions_profile() {
        assert!(super::build_info::source_info().contains(super::build_info::profile()));
    }
}
