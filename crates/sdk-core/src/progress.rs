//! Progress reporting for long-running resolve/push runs.
//!
//! The resolver weights its phases by unit counts and reports through
//! this trait; the CLI binds it to indicatif, tests use [`NoProgress`].

/// Sink for progress events. Implementations must be cheap: the resolver
/// calls [`Progress::advance`] once per POM fetch and per file transfer.
pub trait Progress: Send + Sync {
    /// A new phase begins with the given number of work units. Zero
    /// units means the count is not known up front.
    fn begin_phase(&self, name: &str, units: u64);

    /// `delta` units of the current phase completed.
    fn advance(&self, delta: u64);

    /// Sets the detail line (e.g. the coordinate being fetched).
    fn message(&self, text: &str);

    /// The whole run is complete.
    fn finish(&self);
}

/// Discards all progress events.
pub struct NoProgress;

impl Progress for NoProgress {
    fn begin_phase(&self, _name: &str, _units: u64) {}
    fn advance(&self, _delta: u64) {}
    fn message(&self, _text: &str) {}
    fn finish(&self) {}
}
