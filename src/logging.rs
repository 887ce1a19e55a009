use std::path::PathBuf;
use std::time::SystemTime;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Crates whose debug output drowns out our own.
const NOISY_TARGETS: [&str; 4] = ["reqwest", "hyper", "hyper_util", "rustls"];

pub fn setup_logging(
    console_level: LevelFilter,
    log_file: Option<PathBuf>,
    file_level: LevelFilter,
) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Magenta)
        .trace(Color::BrightBlack);

    let console = fern::Dispatch::new()
        .level(console_level)
        .format(move |out, message, record| {
            out.finish(format_args!("{:>5} {}", colors.color(record.level()), message))
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new().chain(console);
    let mut max_level = console_level;

    if let Some(path) = log_file {
        let file = fern::log_file(&path)
            .wrap_err(format!("Failed to open log file: {}", path.display()))?;
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .level(file_level)
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{} {} {}] {}",
                        humantime::format_rfc3339_seconds(SystemTime::now()),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .chain(file),
        );
        max_level = max_level.max(file_level);
    }

    for target in NOISY_TARGETS {
        dispatch = dispatch.level_for(target, LevelFilter::Warn.min(max_level));
    }

    dispatch
        .level(max_level)
        .apply()
        .wrap_err("Failed to install logger")?;

    Ok(())
}
