// src/diagnostics.rs

/// User-facing status and error output.
///
/// The scheduler clears it and prints a voice summary after each successful
/// `play`, and prints tick faults as errors.
pub trait Diagnostics {
    fn clear(&mut self);
    fn print(&mut self, text: &str);
    fn print_error(&mut self, text: &str);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn clear(&mut self) {}

    fn print(&mut self, text: &str) {
        log::info!("{}", text);
    }

    fn print_error(&mut self, text: &str) {
        log::error!("{}", text);
    }
}
