//! Reporter trait for dependency injection
//!
//! This trait allows the pipeline to report progress and status without
//! being coupled to a specific console or log format.

use atlhub_schema::AppIdentity;

pub trait Reporter: Send + Sync {
    /// Indicates a new section or phase has started (e.g. "Packaging", "Publishing").
    fn section(&self, title: &str);

    /// Assets for an app are being fetched.
    fn fetching(&self, app: &AppIdentity, url: &str);

    /// An external tool step (build, bundle) is starting for an app.
    fn building(&self, app: &AppIdentity, step: &str);

    /// An app was left untouched.
    fn skipped(&self, app: &AppIdentity, reason: &str);

    /// Marks an app as successfully processed.
    fn done(&self, app: &AppIdentity, detail: &str);

    /// Marks an app as failed with a specific reason.
    fn failed(&self, app: &AppIdentity, reason: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Display the final tally of a run.
    fn summary(&self, built: usize, skipped: usize, failed: usize, elapsed_secs: f64);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn fetching(&self, app: &AppIdentity, url: &str) {
        (**self).fetching(app, url);
    }
    fn building(&self, app: &AppIdentity, step: &str) {
        (**self).building(app, step);
    }
    fn skipped(&self, app: &AppIdentity, reason: &str) {
        (**self).skipped(app, reason);
    }
    fn done(&self, app: &AppIdentity, detail: &str) {
        (**self).done(app, detail);
    }
    fn failed(&self, app: &AppIdentity, reason: &str) {
        (**self).failed(app, reason);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn summary(&self, built: usize, skipped: usize, failed: usize, elapsed_secs: f64) {
        (**self).summary(built, skipped, failed, elapsed_secs);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn fetching(&self, _: &AppIdentity, _: &str) {}
    fn building(&self, _: &AppIdentity, _: &str) {}
    fn skipped(&self, _: &AppIdentity, _: &str) {}
    fn done(&self, _: &AppIdentity, _: &str) {}
    fn failed(&self, _: &AppIdentity, _: &str) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn summary(&self, _: usize, _: usize, _: usize, _: f64) {}
}
