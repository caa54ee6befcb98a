use log::LevelFilter;

/// Initialize the logger at `level`, letting `RUST_LOG` refine it.
///
/// Logs go to stderr so a PPM stream on stdout stays clean.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}
