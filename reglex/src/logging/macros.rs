//! Logging macros over an injected `LoggingService`
//!
//! Every macro takes the service first so that compiler and tokenizer
//! instances log through their own sink. Context values accept any
//! `Display` type.

// ============================================================================
// ERROR LOGGING
// ============================================================================

/// Log error with Code type
#[macro_export]
macro_rules! log_error {
    ($service:expr, $code:expr, $message:expr) => {
        $service.log_error_with_context($code, $message, vec![])
    };

    ($service:expr, $code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $service.log_error_with_context($code, $message, context_refs)
        }
    };
}

// ============================================================================
// SUCCESS LOGGING
// ============================================================================

/// Log success with Code type
#[macro_export]
macro_rules! log_success {
    ($service:expr, $code:expr, $message:expr) => {
        $service.log_success_with_context($code, $message, vec![])
    };

    ($service:expr, $code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $service.log_success_with_context($code, $message, context_refs)
        }
    };
}

// ============================================================================
// PLAIN LEVEL LOGGING
// ============================================================================

/// Shared expansion for the level-only macros
#[doc(hidden)]
#[macro_export]
macro_rules! __log_at_level {
    ($service:expr, $level:expr, $message:expr) => {
        $service.log_with_context($level, $message, vec![])
    };

    ($service:expr, $level:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            // Skip formatting the context when the level is filtered out
            if $service.should_log($level) {
                let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
                let context_refs: Vec<(&str, &str)> = context_strings.iter()
                    .map(|(k, v)| (*k, v.as_str()))
                    .collect();
                $service.log_with_context($level, $message, context_refs)
            }
        }
    };
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($service:expr, $($rest:tt)+) => {
        $crate::__log_at_level!($service, $crate::logging::LogLevel::Info, $($rest)+)
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warning {
    ($service:expr, $($rest:tt)+) => {
        $crate::__log_at_level!($service, $crate::logging::LogLevel::Warning, $($rest)+)
    };
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($service:expr, $($rest:tt)+) => {
        $crate::__log_at_level!($service, $crate::logging::LogLevel::Debug, $($rest)+)
    };
}
