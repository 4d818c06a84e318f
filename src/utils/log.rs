use crate::utils::config::Config;
use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::{self, File};
use std::io::Write;
use std::process;

/// Logs go to a dated file under the config dir, never to stdout:
/// anything printed there would land in the middle of the prompt.
pub fn init_logger(config: &Config) {
    let level = match &config.logger_level {
        level if level.eq_ignore_ascii_case("error") => LevelFilter::Error,
        level if level.eq_ignore_ascii_case("warn") => LevelFilter::Warn,
        level if level.eq_ignore_ascii_case("info") => LevelFilter::Info,
        level if level.eq_ignore_ascii_case("debug") => LevelFilter::Debug,
        level if level.eq_ignore_ascii_case("trace") => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    };

    let target = match open_log_file(config) {
        Some(file) => Target::Pipe(Box::new(file)),
        None => Target::Stderr,
    };

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[PID:{}][{}] {} - {}",
                process::id(),
                record.level(),
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.args()
            )
        })
        .target(target)
        .filter(None, level)
        .init();
}

fn open_log_file(config: &Config) -> Option<File> {
    if fs::create_dir_all(&config.logger_dir).is_err() {
        return None;
    }
    let date = Local::now().format("%Y-%m-%d");
    let log_file = config.logger_dir.join(format!("smsh_{}.log", date));
    File::options().create(true).append(true).open(log_file).ok()
}
