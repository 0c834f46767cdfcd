use colored::Colorize;
use log::Level;

/// Stderr dispatch for harnesses that want to watch the solver work:
/// `level: [target] message`, with the level colorized.
pub fn dispatch(level: log::LevelFilter) -> fern::Dispatch {
    fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            let level = record.level();
            let label = format!("{}:", level.to_string().to_lowercase());
            let label = match level {
                Level::Error => label.as_str().red(),
                Level::Warn => label.as_str().yellow(),
                Level::Info => label.as_str().blue(),
                Level::Debug => label.as_str().magenta(),
                Level::Trace => label.as_str().green(),
            };
            out.finish(format_args!("{} [{}] {}", label, record.target(), message))
        })
        .chain(std::io::stderr())
}

/// Install the dispatch as the global logger. Fails if a logger is already
/// installed; callers that only care that *some* logger is up can ignore
/// the error.
pub fn try_init(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    dispatch(level).apply()
}
