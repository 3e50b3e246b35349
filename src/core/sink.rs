//! Sink trait for log output destinations

use super::error::Result;

/// Destination the background worker writes lines to.
///
/// Only the worker thread ever touches a sink, so implementations need no
/// internal synchronization. `line` carries no trailing newline; the sink
/// terminates it.
///
/// The worker counts a line as written when `write_line` returns `Ok`, so a
/// sink that buffers must report delivery errors there rather than leaving
/// them for `flush`.
pub trait Sink: Send {
    fn write_line(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
