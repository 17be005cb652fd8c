//! Repository-build stage.
//!
//! Runs `flatpak-builder` and `flatpak build-bundle` for every packaged app,
//! one app at a time, then refreshes the shared repository once:
//!
//! | Step | Command |
//! |---|---|
//! | build | `flatpak-builder --repo=<repo> --assumeyes --force-clean <build>/<app> <apps>/<app>/<app>.yml` |
//! | bundle | `flatpak build-bundle --runtime-repo=<url> <repo> <bundles>/<app>.flatpak <app>` |
//! | update | `flatpak build-update-repo --generate-static-deltas --prune <repo>` |
//!
//! The repository is mutated in place, so nothing here runs concurrently.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use atlhub_schema::AppIdentity;

use crate::{PublishConfig, Reporter};

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{tool} not found: {source}")]
    NotFound {
        tool: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed ({status})")]
    Exit { tool: String, status: ExitStatus },

    #[error("filesystem error at {}: {}", .path.display(), .source)]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    fn filesystem(path: &Path, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Resolved locations of the external executables.
#[derive(Debug, Clone)]
pub struct Toolchain {
    builder: PathBuf,
    flatpak: PathBuf,
}

impl Toolchain {
    /// Resolve `flatpak-builder` and `flatpak` before any work starts.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] if either executable cannot be found.
    pub fn locate(config: &PublishConfig) -> Result<Self, ToolError> {
        let resolve = |bin: &Path| {
            which::which(bin).map_err(|source| ToolError::NotFound {
                tool: bin.display().to_string(),
                source,
            })
        };
        Ok(Self {
            builder: resolve(&config.builder_bin)?,
            flatpak: resolve(&config.flatpak_bin)?,
        })
    }

    pub fn builder(&self) -> &Path {
        &self.builder
    }

    pub fn flatpak(&self) -> &Path {
        &self.flatpak
    }
}

/// Outcome of building and bundling one app.
#[derive(Debug, Clone)]
pub struct AppPublishResult {
    pub app_id: String,
    pub error: Option<String>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    pub results: Vec<AppPublishResult>,
    /// Set when `halt_on_error` stopped the run early.
    pub halted: bool,
    /// Whether `build-update-repo` ran and succeeded.
    pub repo_updated: bool,
    pub update_error: Option<String>,
}

impl PublishReport {
    pub fn built(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_none()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_some()).count()
    }

    /// No app failed and the repository refresh did not fail.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.update_error.is_none()
    }
}

/// List packaged apps under `apps_dir`, sorted by app id.
///
/// A directory counts as packaged when it contains `<dir>/<dir>.yml`.
/// Anything else is reported and ignored.
///
/// # Errors
///
/// Returns [`ToolError::Filesystem`] if `apps_dir` cannot be read.
pub async fn discover_packaged_apps<R: Reporter>(
    apps_dir: &Path,
    reporter: &R,
) -> Result<Vec<AppIdentity>, ToolError> {
    let mut read_dir = tokio::fs::read_dir(apps_dir)
        .await
        .map_err(|e| ToolError::filesystem(apps_dir, e))?;

    let mut apps = Vec::new();
    while let Some(dir_entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| ToolError::filesystem(apps_dir, e))?
    {
        let file_type = dir_entry
            .file_type()
            .await
            .map_err(|e| ToolError::filesystem(&dir_entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        let path = dir_entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let identity = AppIdentity::from_app_id(name);
        let manifest = path.join(identity.manifest_file_name());
        if matches!(tokio::fs::metadata(&manifest).await, Ok(meta) if meta.is_file()) {
            apps.push(identity);
        } else {
            reporter.warning(&format!(
                "{} has no {}, ignoring",
                path.display(),
                identity.manifest_file_name()
            ));
        }
    }

    apps.sort_by(|a, b| a.app_id().cmp(b.app_id()));
    Ok(apps)
}

/// Build, bundle and publish every packaged app, then refresh the repository.
///
/// `filter` restricts the run to a single app id. Per-app tool failures are
/// recorded in the report; only setup and discovery failures are returned
/// as errors.
///
/// # Errors
///
/// Returns [`ToolError::Filesystem`] if the output directories cannot be
/// created or `apps_dir` cannot be read.
pub async fn publish<R: Reporter>(
    config: &PublishConfig,
    toolchain: &Toolchain,
    reporter: &R,
    filter: Option<&str>,
) -> Result<PublishReport, ToolError> {
    for dir in [&config.build_dir, &config.bundle_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ToolError::filesystem(dir, e))?;
    }
    if let Some(parent) = config.repo_dir.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ToolError::filesystem(parent, e))?;
    }

    let mut apps = discover_packaged_apps(&config.apps_dir, reporter).await?;
    if let Some(id) = filter {
        apps.retain(|app| app.app_id() == id);
    }
    info!("publishing {} apps into {}", apps.len(), config.repo_dir.display());

    let mut report = PublishReport::default();
    for app in &apps {
        let start = Instant::now();
        let result = publish_app(config, toolchain, reporter, app).await;
        let error = match result {
            Ok(()) => {
                reporter.done(app, "built and bundled");
                None
            }
            Err(e) => {
                warn!(app_id = %app, "publish failed: {e}");
                reporter.failed(app, &e.to_string());
                Some(e.to_string())
            }
        };

        let failed = error.is_some();
        report.results.push(AppPublishResult {
            app_id: app.app_id().to_string(),
            error,
            duration: start.elapsed(),
        });

        if failed && config.halt_on_error {
            reporter.warning("halting after first failure");
            report.halted = true;
            return Ok(report);
        }
    }

    if report.built() == 0 {
        reporter.info("nothing built, repository left unchanged");
        return Ok(report);
    }

    reporter.info(&format!("updating {}", config.repo_dir.display()));
    match update_repo(config, toolchain).await {
        Ok(()) => report.repo_updated = true,
        Err(e) => {
            warn!("repository update failed: {e}");
            reporter.warning(&format!("repository update failed: {e}"));
            report.update_error = Some(e.to_string());
        }
    }

    Ok(report)
}

async fn publish_app<R: Reporter>(
    config: &PublishConfig,
    toolchain: &Toolchain,
    reporter: &R,
    app: &AppIdentity,
) -> Result<(), ToolError> {
    reporter.building(app, "build");
    run_tool(toolchain.builder(), &build_args(config, app)).await?;

    reporter.building(app, "bundle");
    run_tool(toolchain.flatpak(), &bundle_args(config, app)).await
}

async fn update_repo(config: &PublishConfig, toolchain: &Toolchain) -> Result<(), ToolError> {
    run_tool(toolchain.flatpak(), &update_args(config)).await
}

/// `flatpak-builder` arguments for one app.
pub fn build_args(config: &PublishConfig, app: &AppIdentity) -> Vec<OsString> {
    let manifest = config
        .apps_dir
        .join(app.app_id())
        .join(app.manifest_file_name());
    vec![
        flag_with_path("--repo=", &config.repo_dir),
        "--assumeyes".into(),
        "--force-clean".into(),
        config.build_dir.join(app.app_id()).into_os_string(),
        manifest.into_os_string(),
    ]
}

/// `flatpak build-bundle` arguments for one app.
pub fn bundle_args(config: &PublishConfig, app: &AppIdentity) -> Vec<OsString> {
    vec![
        "build-bundle".into(),
        format!("--runtime-repo={}", config.runtime_repo).into(),
        config.repo_dir.clone().into_os_string(),
        config
            .bundle_dir
            .join(app.bundle_file_name())
            .into_os_string(),
        app.app_id().into(),
    ]
}

/// `flatpak build-update-repo` arguments.
pub fn update_args(config: &PublishConfig) -> Vec<OsString> {
    vec![
        "build-update-repo".into(),
        "--generate-static-deltas".into(),
        "--prune".into(),
        config.repo_dir.clone().into_os_string(),
    ]
}

fn flag_with_path(flag: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(path);
    arg
}

/// Run a tool with inherited stdio and fail on a non-zero exit.
async fn run_tool(program: &Path, args: &[OsString]) -> Result<(), ToolError> {
    let tool = program.display().to_string();
    debug!("running {tool} {args:?}");

    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|source| ToolError::Spawn {
            tool: tool.clone(),
            source,
        })?;

    if !status.success() {
        return Err(ToolError::Exit { tool, status });
    }
    Ok(())
}
