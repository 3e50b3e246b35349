//! Sink implementations

pub mod console;
pub mod rotating_file;

pub use console::ConsoleSink;
pub use rotating_file::{RotatingFileSink, RotationPolicy};

pub use crate::core::Sink;

use crate::core::config::{Config, SinkTarget};

/// Open the sink a configuration describes.
///
/// A file target without an explicit rotation policy uses
/// [`RotationPolicy::default`].
pub fn for_config(config: &Config) -> Box<dyn Sink> {
    match config.sink() {
        SinkTarget::Console => Box::new(ConsoleSink::new()),
        SinkTarget::File(path) => Box::new(RotatingFileSink::new(
            path.clone(),
            config.rotation().cloned().unwrap_or_default(),
        )),
    }
}
