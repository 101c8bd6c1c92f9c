// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Writes "icon  message" lines to stderr so stdout stays clean for the
/// scene JSON.
struct ConsoleLogger;

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

pub fn level_icon(level: Level) -> &'static str {
  match level {
    Level::Error => "🔴",
    Level::Warn => "🟠",
    Level::Info => "🔵",
    Level::Debug => "⚪",
    Level::Trace => "▫️",
  }
}

fn format_record(record: &Record) -> String {
  format!("{}  {}", level_icon(record.level()), record.args())
}

impl log::Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      let stderr = std::io::stderr();
      let mut handle = stderr.lock();
      let _ = writeln!(handle, "{}", format_record(record));
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format() {
    let line = format_record(
      &Record::builder()
        .args(format_args!("File not found"))
        .level(Level::Error)
        .build(),
    );
    assert_eq!(line, "🔴  File not found");
  }

  #[test]
  fn test_icons_distinct() {
    let icons = [Level::Error, Level::Warn, Level::Info, Level::Debug].map(level_icon);
    for i in 0..icons.len() {
      for j in (i + 1)..icons.len() {
        assert_ne!(icons[i], icons[j]);
      }
    }
  }
}
