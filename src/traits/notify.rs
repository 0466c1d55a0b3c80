//! User notification trait abstraction.

/// Trait for raising user-visible notifications.
///
/// Both upload successes and failures are reported through this single
/// channel. Implementations must never block the calling task and must
/// swallow delivery failures (a lost notification is not an error).
pub trait Notifier: Send + Sync {
    /// Raise a notification with the given title and body.
    fn notify(&self, title: &str, body: &str);
}
