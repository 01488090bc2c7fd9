//! Plain stderr logging for lifecycle lines.
//!
//! `wlog!` prints `YYYY-MM-DD HH:MM:SS [MODULE] Message`, the same layout the
//! tracing subscriber uses in `main`, for messages that should show up even
//! when `RUST_LOG` filters the module out.

#[macro_export]
macro_rules! wlog {
    ($module:expr, $($arg:tt)*) => {{
        let now = chrono::Local::now();
        eprintln!("{} [{}] {}",
            now.format("%Y-%m-%d %H:%M:%S"),
            $module,
            format!($($arg)*)
        );
    }};
}

/// Standardized module identifiers
pub const MAIN: &str = "MAIN";
pub const VIEWS: &str = "VIEWS";
pub const FOCUS: &str = "FOCUS";
pub const INPUT: &str = "INPUT";
pub const OUTPUT: &str = "OUTPUT";
pub const PROCESS: &str = "PROCESS";
