//! Process-level control hooks.

/// What the dispatcher may ask of the hosting process.
///
/// Workers ask their supervisor for a graceful shutdown; standalone processes
/// exit outright.
pub trait ProcessControl: Send + Sync {
    /// Asks for a graceful shutdown.
    ///
    /// May be called more than once.
    fn request_shutdown(&self);

    /// Ends the process with `code`.
    fn terminate(&self, code: i32);
}
