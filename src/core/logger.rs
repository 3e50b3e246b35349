//! Asynchronous logger
//!
//! Callers format lines on their own thread and push them onto a bounded
//! queue; a single background worker drains the queue into the sink. The
//! sink is only ever touched by that worker.

use super::{
    config::Config,
    error::LoggerError,
    formatter,
    metrics::LoggerMetrics,
    severity::Severity,
    sink::Sink,
};
use crate::sinks;
use chrono::Utc;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::thread;

/// Number of formatted lines the queue holds before callers block
pub const QUEUE_CAPACITY: usize = 100;

/// Exit status used by [`AsyncLogger::fatal`]
pub const FATAL_EXIT_CODE: i32 = 1;

/// Leveled logger with a background writer.
///
/// Lines reach the sink in the order they were enqueued, exactly once.
/// Delivery is best effort: sink write failures are counted in
/// [`LoggerMetrics`] but never reported to the caller that logged the line.
///
/// # Example
///
/// ```
/// use esl_logger::AsyncLogger;
///
/// let logger = AsyncLogger::new("billing", "development", None);
/// let line = logger.info(format_args!("charged {} cents", 1250));
/// assert!(line.ends_with("billing INFO: charged 1250 cents"));
/// logger.close();
/// ```
pub struct AsyncLogger {
    config: Config,
    sender: RwLock<Option<Sender<String>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    metrics: Arc<LoggerMetrics>,
}

impl AsyncLogger {
    /// Create a logger and start its worker.
    ///
    /// The production preset (rotating file at `sink_target`) is used only
    /// when `environment` is exactly `"production"` and a non-empty target is
    /// given; otherwise lines go to standard output.
    pub fn new(name: impl Into<String>, environment: &str, sink_target: Option<&Path>) -> Self {
        Self::with_config(Config::select(name, environment, sink_target))
    }

    /// Start a logger whose sink is derived from `config`
    pub fn with_config(config: Config) -> Self {
        let sink = sinks::for_config(&config);
        Self::start(config, sink)
    }

    /// Start a logger that writes to a caller-provided sink
    pub fn with_sink(config: Config, sink: impl Sink + 'static) -> Self {
        Self::start(config, Box::new(sink))
    }

    fn start(config: Config, sink: Box<dyn Sink>) -> Self {
        let (sender, receiver) = bounded(QUEUE_CAPACITY);
        let metrics = Arc::new(LoggerMetrics::new());
        let worker_metrics = Arc::clone(&metrics);

        let handle = thread::spawn(move || Self::run_worker(receiver, sink, &worker_metrics));

        Self {
            config,
            sender: RwLock::new(Some(sender)),
            worker: Mutex::new(Some(handle)),
            metrics,
        }
    }

    /// Drain the queue until it is closed and empty
    fn run_worker(receiver: Receiver<String>, mut sink: Box<dyn Sink>, metrics: &LoggerMetrics) {
        let sink_name = sink.name().to_string();
        for line in receiver.iter() {
            Self::write_line(sink.as_mut(), &sink_name, &line, metrics);

            // Flush once the burst is over rather than per line
            if receiver.is_empty() {
                Self::flush_sink(sink.as_mut());
            }
        }
        Self::flush_sink(sink.as_mut());
    }

    /// Write one line with panic isolation; failures are counted, never retried
    fn write_line(sink: &mut dyn Sink, sink_name: &str, line: &str, metrics: &LoggerMetrics) {
        let result = panic::catch_unwind(AssertUnwindSafe(|| sink.write_line(line)))
            .unwrap_or_else(|payload| {
                Err(LoggerError::sink_panicked(sink_name, panic_message(&*payload)))
            });

        match result {
            Ok(()) => metrics.record_written(),
            Err(_) => metrics.record_write_failure(),
        };
    }

    fn flush_sink(sink: &mut dyn Sink) {
        let _ = panic::catch_unwind(AssertUnwindSafe(|| sink.flush()));
    }

    /// Hand a colorized line to the worker, waiting while the queue is full
    ///
    /// # Panics
    ///
    /// Panics if the logger has been closed.
    fn enqueue(&self, line: String) {
        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            panic!("log line enqueued after AsyncLogger::close");
        };

        let sent = match sender.try_send(line) {
            Ok(()) => true,
            Err(TrySendError::Full(line)) => {
                self.metrics.record_blocked_send();
                sender.send(line).is_ok()
            }
            // The worker is gone, which leaves nowhere to deliver
            Err(TrySendError::Disconnected(_)) => false,
        };

        if sent {
            self.metrics.record_enqueued();
        }
    }

    /// Format a line at `severity`, enqueue its colorized form and return
    /// the plain form.
    ///
    /// # Panics
    ///
    /// Panics if called after [`AsyncLogger::close`].
    pub fn log(&self, severity: Severity, message: impl Display) -> String {
        let line = formatter::format(
            self.config.template(),
            &Utc::now(),
            self.config.name(),
            severity,
            message,
        );
        self.enqueue(line.colored);
        line.plain
    }

    #[inline]
    pub fn debug(&self, message: impl Display) -> String {
        self.log(Severity::Debug, message)
    }

    #[inline]
    pub fn info(&self, message: impl Display) -> String {
        self.log(Severity::Info, message)
    }

    #[inline]
    pub fn warn(&self, message: impl Display) -> String {
        self.log(Severity::Warn, message)
    }

    #[inline]
    pub fn error(&self, message: impl Display) -> String {
        self.log(Severity::Error, message)
    }

    /// Enqueue a fatal line and exit the process with status 1.
    ///
    /// The process exits right after the line is queued; it is not waited
    /// for, so it may never reach the sink.
    pub fn fatal(&self, message: impl Display) -> ! {
        self.log(Severity::Fatal, message);
        process::exit(FATAL_EXIT_CODE)
    }

    /// Close the queue and wait for the worker to write every queued line.
    ///
    /// There is no timeout. Calling `close` again is a no-op; a concurrent
    /// second call returns once the first one has finished draining.
    pub fn close(&self) {
        let mut worker = self.worker.lock();
        drop(self.sender.write().take());

        if let Some(handle) = worker.take() {
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] Log worker thread panicked during shutdown: {:?}", e);
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    /// Queue and sink counters
    ///
    /// # Example
    ///
    /// ```
    /// use esl_logger::AsyncLogger;
    ///
    /// let logger = AsyncLogger::new("jobs", "test", None);
    /// logger.debug("tick");
    /// logger.close();
    ///
    /// assert_eq!(logger.metrics().enqueued(), 1);
    /// assert_eq!(logger.metrics().written(), 1);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl Drop for AsyncLogger {
    fn drop(&mut self) {
        self.close();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
