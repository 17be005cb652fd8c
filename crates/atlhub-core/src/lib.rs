pub mod config;
pub mod error;
pub mod icons;
pub mod io;
pub mod package;
pub mod paths;
pub mod publish;
pub mod render;
pub mod reporter;

pub use config::{PackageConfig, PublishConfig};
pub use error::PackageError;
pub use paths::AppPaths;
pub use reporter::{NullReporter, Reporter};

/// User Agent string for outgoing fetches
pub const USER_AGENT: &str = concat!("atlhub-core/", env!("CARGO_PKG_VERSION"));
