//! Plain console output for pipeline progress.

use atlhub_core::Reporter;
use atlhub_schema::AppIdentity;

/// Prints indented progress lines to stdout and problems to stderr.
#[derive(Debug, Default)]
pub(crate) struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn section(&self, title: &str) {
        println!();
        println!("  {}", title.to_lowercase());
    }

    fn fetching(&self, app: &AppIdentity, url: &str) {
        println!("    fetch {app} {url}");
    }

    fn building(&self, app: &AppIdentity, step: &str) {
        println!("    {step} {app}");
    }

    fn skipped(&self, app: &AppIdentity, reason: &str) {
        println!("    skip {app} ({reason})");
    }

    fn done(&self, app: &AppIdentity, detail: &str) {
        println!("    done {app} ({detail})");
    }

    fn failed(&self, app: &AppIdentity, reason: &str) {
        eprintln!("    error: {app}: {reason}");
    }

    fn info(&self, msg: &str) {
        println!("  {msg}");
    }

    fn warning(&self, msg: &str) {
        eprintln!("  warning: {msg}");
    }

    fn summary(&self, built: usize, skipped: usize, failed: usize, elapsed_secs: f64) {
        println!();
        println!("  {built} built, {skipped} skipped, {failed} failed in {elapsed_secs:.1}s");
    }
}
