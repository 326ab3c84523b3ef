//! Log output. The crate logs through the `log` facade; on wasm32 the
//! records go to the browser console.

use log::LevelFilter;

/// Parse a level name, defaulting to `info`.
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}

/// Install the console logger. Calling it again only updates the level.
#[cfg(target_arch = "wasm32")]
pub fn init(level: LevelFilter) {
    if let Some(max) = level.to_level() {
        // Fails only when a logger is already installed.
        let _ = console_log::init_with_level(max);
    }
    log::set_max_level(level);
}

/// Outside the browser the host binary picks its own logger.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LevelFilter) {
    log::set_max_level(level);
}
