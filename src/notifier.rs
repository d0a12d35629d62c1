use crate::output;

/// User-facing outcome of a desk action.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&self, message: &str) {
        output::ok(message);
    }

    fn error(&self, message: &str) {
        output::error(message);
    }
}
