//! Explicit logging handle.
//!
//! The engine never logs through a process-wide singleton on its own. Callers
//! pass a [`Logger`] into the constructor; the default is a no-op. A binary
//! that has installed a `log` backend (e.g. `env_logger`) can hand the engine
//! [`Logger::global`] to route records there.

use log::{Level, Log, Record};
use std::fmt;
use std::sync::Arc;

const LOG_TARGET: &str = "mta_config";

#[derive(Clone, Default)]
enum Sink {
    #[default]
    Noop,
    Global,
    Custom(Arc<dyn Log>),
}

/// A cheap, cloneable handle that forwards records to a `log::Log`.
#[derive(Clone, Default)]
pub struct Logger {
    sink: Sink,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sink = match self.sink {
            Sink::Noop => "noop",
            Sink::Global => "global",
            Sink::Custom(_) => "custom",
        };
        f.debug_struct("Logger").field("sink", &sink).finish()
    }
}

impl Logger {
    /// Discard every record.
    pub fn noop() -> Self {
        Self { sink: Sink::Noop }
    }

    /// Forward records to the backend installed with `log::set_logger`.
    pub fn global() -> Self {
        Self { sink: Sink::Global }
    }

    /// Forward records to `sink`.
    pub fn new(sink: Arc<dyn Log>) -> Self {
        Self {
            sink: Sink::Custom(sink),
        }
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Error, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Warn, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Info, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Debug, args);
    }

    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        let sink: &dyn Log = match &self.sink {
            Sink::Noop => return,
            Sink::Global => log::logger(),
            Sink::Custom(sink) => sink.as_ref(),
        };
        let record = Record::builder()
            .args(args)
            .level(level)
            .target(LOG_TARGET)
            .build();
        if sink.enabled(record.metadata()) {
            sink.log(&record);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::capture::CaptureLog;
    use super::*;

    #[test]
    fn test_custom_sink_receives_records() {
        let sink = Arc::new(CaptureLog::default());
        let logger = Logger::new(sink.clone());

        logger.warn(format_args!("descriptor {} missing", "mta.yaml"));
        logger.info(format_args!("done"));

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, Level::Warn);
        assert_eq!(records[0].1, "descriptor mta.yaml missing");
        assert_eq!(records[1].0, Level::Info);
    }

    #[test]
    fn test_noop_is_default() {
        let logger = Logger::default();
        // Nothing to observe, only that it does not panic
        logger.error(format_args!("ignored"));
        assert_eq!(format!("{:?}", logger), "Logger { sink: \"noop\" }");
    }

    #[test]
    fn test_global_forwards_to_installed_logger() {
        testing_logger::setup();
        Logger::global().error(format_args!("routed"));
        testing_logger::validate(|captured| {
            assert!(captured
                .iter()
                .any(|log| log.body == "routed" && log.level == Level::Error));
        });
    }
}
