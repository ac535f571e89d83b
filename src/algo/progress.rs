//! Progress reporting for the normal synthesis pass.
//!
//! Synthesis over a large mesh can take a while with the scan matcher, so the
//! pass reports how many corners are done after each chunk.
//!
//! # Example
//!
//! ```
//! use shademesh::algo::progress::{Progress, Stage};
//!
//! let progress = Progress::new(|done, total, stage| {
//!     eprintln!("{}: {}/{}", stage, done, total);
//! });
//! progress.report(0, 10, Stage::Averaging);
//! ```

use std::fmt;

/// Phase of the synthesis pass being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Flattening facets and building the incidence matcher.
    Indexing,
    /// Averaging incident normals per corner.
    Averaging,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Indexing => f.write_str("Indexing vertices"),
            Stage::Averaging => f.write_str("Averaging normals"),
        }
    }
}

/// A progress callback invoked from the synthesizing thread.
///
/// The callback receives the number of finished units, the total, and the
/// current stage. It is never called concurrently.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, Stage) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, Stage) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, done: usize, total: usize, stage: Stage) {
        (self.callback)(done, total, stage);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_callback_receives_updates() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |done, total, stage| {
            sink.lock().unwrap().push((done, total, stage));
        });

        progress.report(1, 4, Stage::Indexing);
        progress.report(4, 4, Stage::Averaging);

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![(1, 4, Stage::Indexing), (4, 4, Stage::Averaging)]);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Averaging.to_string(), "Averaging normals");
    }
}
