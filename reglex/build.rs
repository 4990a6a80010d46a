// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    buffering: BufferingLimits,
    compiler: CompilerLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct BufferingLimits {
    default_chunk_size: usize,
    min_chunk_size: usize,
    max_token_length: usize,
}

#[derive(serde::Deserialize)]
struct CompilerLimits {
    max_rule_depth: usize,
    max_pattern_length: usize,
    max_rules: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_log_message_length: usize,
    max_logged_token_preview: usize,
}

impl Default for CompileTimeConfig {
    fn default() -> Self {
        Self {
            buffering: BufferingLimits {
                default_chunk_size: 2048,
                min_chunk_size: 2,
                max_token_length: 16 * 1024 * 1024,
            },
            compiler: CompilerLimits {
                max_rule_depth: 256,
                max_pattern_length: 1024 * 1024,
                max_rules: 65_535,
            },
            logging: LoggingLimits {
                max_log_message_length: 4096,
                max_logged_token_preview: 32,
            },
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=REGLEX_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=REGLEX_CONFIG_DIR");

    let profile = env::var("REGLEX_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("REGLEX_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Config lives next to the workspace manifest
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .unwrap_or_else(|| Path::new(&manifest_dir));

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    let config = if config_path.exists() {
        let config_content = fs::read_to_string(&config_path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

        toml::from_str(&config_content)
            .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e))
    } else {
        println!(
            "cargo:warning=Configuration file {} not found, using built-in limits",
            config_path.display()
        );
        CompileTimeConfig::default()
    };

    validate_constraints(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_constraints(config: &CompileTimeConfig, profile: &str) {
    if config.buffering.min_chunk_size < 2 {
        panic!("min_chunk_size must be at least 2 (rebuffering grows by chunk/2)");
    }

    if config.buffering.default_chunk_size < config.buffering.min_chunk_size {
        panic!("default_chunk_size is smaller than min_chunk_size");
    }

    if config.buffering.max_token_length < config.buffering.default_chunk_size {
        panic!("max_token_length must be at least default_chunk_size");
    }

    if config.compiler.max_rule_depth == 0 {
        panic!("max_rule_depth cannot be zero");
    }

    if profile == "production" && config.buffering.max_token_length > 64 * 1024 * 1024 {
        panic!("PRODUCTION: max_token_length too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod buffering {{
        pub const DEFAULT_CHUNK_SIZE: usize = {};
        pub const MIN_CHUNK_SIZE: usize = {};
        pub const MAX_TOKEN_LENGTH: usize = {};
    }}

    pub mod compiler {{
        pub const MAX_RULE_DEPTH: usize = {};
        pub const MAX_PATTERN_LENGTH: usize = {};
        pub const MAX_RULES: usize = {};
    }}

    pub mod logging {{
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_LOGGED_TOKEN_PREVIEW: usize = {};
    }}
}}
"#,
        profile,
        config.buffering.default_chunk_size,
        config.buffering.min_chunk_size,
        config.buffering.max_token_length,
        config.compiler.max_rule_depth,
        config.compiler.max_pattern_length,
        config.compiler.max_rules,
        config.logging.max_log_message_length,
        config.logging.max_logged_token_preview,
    );

    fs::write(output_path, constants_code).unwrap();
}
