use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEBUG_FILTER: &str = "chessbridge=debug";

/// Diagnostics go to stderr and only with the debug toggle on. `RUST_LOG`
/// narrows or widens them then, it never enables them on its own.
pub fn init_logger(debug: bool) {
    let directives = filter_directives(debug, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEBUG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_names(true)
                .compact(),
        )
        .init();
}

fn filter_directives(debug: bool, rust_log: Option<String>) -> String {
    if !debug {
        return "off".to_string();
    }
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => directives,
        _ => DEBUG_FILTER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_ignored_without_debug() {
        assert_eq!(filter_directives(false, None), "off");
        assert_eq!(filter_directives(false, Some("info".to_string())), "off");
        assert_eq!(filter_directives(false, Some("trace".to_string())), "off");
    }

    #[test]
    fn debug_defaults_to_crate_filter() {
        assert_eq!(filter_directives(true, None), "chessbridge=debug");
        assert_eq!(filter_directives(true, Some(" ".to_string())), "chessbridge=debug");
    }

    #[test]
    fn rust_log_applies_with_debug() {
        assert_eq!(filter_directives(true, Some("warn".to_string())), "warn");
    }
}
