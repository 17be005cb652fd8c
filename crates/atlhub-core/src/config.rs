//! Run configuration for both pipeline stages.
//!
//! The CLI fills these from flags and environment; tests construct them
//! directly against temporary directories.

use std::path::PathBuf;

use atlhub_schema::ICON_SIZES;

use crate::paths::{DEFAULT_APPS_DIR, DEFAULT_BUILD_DIR, DEFAULT_BUNDLE_DIR, DEFAULT_REPO_DIR};

/// Remote used by `flatpak build-bundle` to resolve the runtime.
pub const FLATHUB_RUNTIME_REPO: &str = "https://dl.flathub.org/repo/flathub.flatpakrepo";

/// Packaging stage settings.
#[derive(Debug, Clone)]
pub struct PackageConfig {
    /// Root of the per-app output directories.
    pub apps_dir: PathBuf,
    /// Icon edge lengths to render.
    pub icon_sizes: Vec<u32>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            apps_dir: PathBuf::from(DEFAULT_APPS_DIR),
            icon_sizes: ICON_SIZES.to_vec(),
        }
    }
}

/// Repository-build stage settings.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Root of the per-app output directories produced by the packaging stage.
    pub apps_dir: PathBuf,
    /// `flatpak-builder` build directories, one per app.
    pub build_dir: PathBuf,
    /// Shared OSTree repository.
    pub repo_dir: PathBuf,
    /// Where `.flatpak` bundles are written.
    pub bundle_dir: PathBuf,
    /// `--runtime-repo` passed to `flatpak build-bundle`.
    pub runtime_repo: String,
    /// Stop at the first failing app instead of continuing.
    pub halt_on_error: bool,
    /// `flatpak-builder` executable (name on `PATH` or a path).
    pub builder_bin: PathBuf,
    /// `flatpak` executable (name on `PATH` or a path).
    pub flatpak_bin: PathBuf,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            apps_dir: PathBuf::from(DEFAULT_APPS_DIR),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            repo_dir: PathBuf::from(DEFAULT_REPO_DIR),
            bundle_dir: PathBuf::from(DEFAULT_BUNDLE_DIR),
            runtime_repo: FLATHUB_RUNTIME_REPO.to_string(),
            halt_on_error: false,
            builder_bin: PathBuf::from("flatpak-builder"),
            flatpak_bin: PathBuf::from("flatpak"),
        }
    }
}
