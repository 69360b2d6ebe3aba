use std::{fmt::Display, str::FromStr};

use anyhow::Result;
use backtrace::Backtrace;
use tracing::{debug, error, info, level_filters::LevelFilter, trace, warn, Level};

pub fn init(display_level: &bool, level_filter: &str) -> Result<()> {
    let level_filter = LevelFilter::from_str(level_filter)?;

    tracing_subscriber::fmt()
        .with_level(*display_level)
        .with_target(false)
        .with_max_level(level_filter)
        .try_init()
        .map_err(|err| anyhow::Error::msg(err.to_string()))
}

fn emit<T: Display>(level: Level, prefix: Option<&str>, fallback: &str, msg: T) {
    let prefix = prefix.unwrap_or(fallback);
    match level {
        Level::TRACE => trace!("{prefix} {msg}"),
        Level::DEBUG => debug!("{prefix} {msg}"),
        Level::INFO => info!("{prefix} {msg}"),
        Level::WARN => warn!("{prefix} {msg}"),
        Level::ERROR => error!("{prefix} {msg}"),
    }
}

pub fn trace<T: Display>(prefix: Option<&str>, msg: T) {
    emit(Level::TRACE, prefix, "🐾", msg);
}

pub fn debug<T: Display>(prefix: Option<&str>, msg: T) {
    emit(Level::DEBUG, prefix, "🐞", msg);
}

pub fn info<T: Display>(prefix: Option<&str>, msg: T) {
    emit(Level::INFO, prefix, "📢", msg);
}

pub fn warn<T: Display>(prefix: Option<&str>, msg: T) {
    emit(Level::WARN, prefix, "⚠️", msg);
}

/// Logs at error level. A backtrace is appended when `RUST_BACKTRACE=1`.
pub fn error<T: Display>(prefix: Option<&str>, msg: T) {
    let show_backtrace = std::env::var("RUST_BACKTRACE").is_ok_and(|var| var == "1");
    if show_backtrace {
        emit(
            Level::ERROR,
            prefix,
            "🚨",
            format!("{msg}\n{:?}", Backtrace::new()),
        );
    } else {
        emit(Level::ERROR, prefix, "🚨", msg);
    }
}

pub fn panic<T: Display>(prefix: Option<&str>, msg: T) -> ! {
    match prefix {
        Some(prefix) => panic!("{prefix} {msg}"),
        None => panic!("☠️ {msg}"),
    }
}
