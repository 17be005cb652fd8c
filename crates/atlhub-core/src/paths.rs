use std::path::{Path, PathBuf};

use atlhub_schema::AppIdentity;

/// Default catalog location, relative to the working directory.
pub const DEFAULT_CATALOG: &str = "data/apks.json";

/// Default root of the per-app output directories.
pub const DEFAULT_APPS_DIR: &str = "apps";

/// Default `flatpak-builder` state/build root.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Default shared OSTree repository.
pub const DEFAULT_REPO_DIR: &str = "FlatpakRepo/repo";

/// Default output directory for single-file bundles.
pub const DEFAULT_BUNDLE_DIR: &str = "bundles";

/// On-disk locations of every artifact of one packaged app.
///
/// Layout: `<apps_dir>/<app_id>/...`
#[derive(Debug, Clone)]
pub struct AppPaths {
    dir: PathBuf,
    identity: AppIdentity,
}

impl AppPaths {
    pub fn new(apps_dir: &Path, identity: &AppIdentity) -> Self {
        Self {
            dir: apps_dir.join(identity.app_id()),
            identity: identity.clone(),
        }
    }

    /// The app's output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Primary artifact; its presence marks the app as packaged.
    pub fn apk(&self) -> PathBuf {
        self.dir.join(self.identity.apk_file_name())
    }

    pub fn icon(&self, size: u32) -> PathBuf {
        self.dir.join(self.identity.icon_file_name(size))
    }

    pub fn desktop(&self) -> PathBuf {
        self.dir.join(self.identity.desktop_file_name())
    }

    pub fn metainfo(&self) -> PathBuf {
        self.dir.join(self.identity.metainfo_file_name())
    }

    pub fn script(&self) -> PathBuf {
        self.dir.join(self.identity.script_file_name())
    }

    pub fn manifest(&self) -> PathBuf {
        self.dir.join(self.identity.manifest_file_name())
    }
}
