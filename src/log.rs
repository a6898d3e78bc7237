use log::LevelFilter;

/// Initialize logging for the CLI.
///
/// Logs at `Debug` when `debug_enabled` is set and at `Info` otherwise; an explicit `RUST_LOG`
/// overrides both.
pub fn init_logger(debug_enabled: bool) {
    let level = if debug_enabled { LevelFilter::Debug } else { LevelFilter::Info };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // A second initialization (e.g. from tests) is harmless; keep the first logger.
    if builder.try_init().is_ok() {
        log::debug!("Logger initialized at {level:?} level");
    }
}
