//! Packaging stage: turn catalog entries into Flatpak-ready app directories.
//!
//! Each entry runs independently. A failing entry is logged and reported;
//! it never affects its siblings.

use std::time::{Duration, Instant};

use futures::future::{join_all, try_join_all};
use reqwest::Client;
use tracing::{debug, error};

use atlhub_schema::{AppIdentity, Catalog, CatalogEntry, FlatpakManifest};

use crate::icons::derive_icon_variants;
use crate::io::fetch::fetch_bytes;
use crate::io::fs::{ensure_dir, exists, make_executable, write_file};
use crate::{AppPaths, PackageConfig, PackageError, Reporter, render};

/// Terminal state of an entry that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Output already present and no update requested. Nothing was fetched.
    Skipped,
    /// All artifacts were written.
    Completed { icons: usize },
}

/// Result of processing a single entry, as collected by [`package_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Completed,
    Skipped,
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct EntryReport {
    pub app_id: String,
    pub status: EntryStatus,
    pub duration: Duration,
}

/// Per-status counts over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub built: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_reports(reports: &[EntryReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match report.status {
                EntryStatus::Completed => summary.built += 1,
                EntryStatus::Skipped => summary.skipped += 1,
                EntryStatus::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Total number of entries.
    pub fn total(&self) -> usize {
        self.built + self.skipped + self.failed
    }
}

/// Everything an entry needs besides the entry itself.
pub struct PackageContext<'a, R: Reporter> {
    pub client: &'a Client,
    pub config: &'a PackageConfig,
    pub reporter: &'a R,
}

impl<'a, R: Reporter> PackageContext<'a, R> {
    pub fn new(client: &'a Client, config: &'a PackageConfig, reporter: &'a R) -> Self {
        Self {
            client,
            config,
            reporter,
        }
    }
}

/// Package one catalog entry end-to-end.
///
/// 1. Creates `<apps_dir>/<app_id>/`.
/// 2. Skips if the APK is already there, unless the entry sets `shouldUpdate`.
/// 3. Fetches the APK and icon concurrently.
/// 4. Writes every icon variant.
/// 5. Writes the desktop entry, metainfo, launcher and manifest.
/// 6. Writes the APK.
///
/// The manifest is assembled from the variants that were written in step 4,
/// so it only ever lists icons that exist on disk. The APK is written last:
/// its presence marks the entry as packaged for step 2.
///
/// # Errors
///
/// Any fetch, image or filesystem failure aborts this entry only.
pub async fn process_entry<R: Reporter>(
    ctx: &PackageContext<'_, R>,
    entry: &CatalogEntry,
) -> Result<EntryOutcome, PackageError> {
    let identity = AppIdentity::from_entry(entry);
    let paths = AppPaths::new(&ctx.config.apps_dir, &identity);

    ensure_dir(paths.dir()).await?;

    if !entry.forces_update() && exists(&paths.apk()).await? {
        debug!("{identity}: {} present, skipping", paths.apk().display());
        return Ok(EntryOutcome::Skipped);
    }

    ctx.reporter.fetching(&identity, &entry.apk_file);
    let (apk, icon) = tokio::try_join!(
        fetch_bytes(ctx.client, &entry.apk_file),
        fetch_bytes(ctx.client, &entry.icon),
    )?;

    let variants = derive_icon_variants(icon, &ctx.config.icon_sizes).await?;

    try_join_all(
        variants
            .iter()
            .map(|variant| write_file(paths.icon(variant.size), &variant.png)),
    )
    .await?;

    let sizes: Vec<u32> = variants.iter().map(|v| v.size).collect();
    let manifest = serde_yaml_ng::to_string(&FlatpakManifest::for_app(&identity, &sizes))?;
    let desktop = render::desktop_entry(
        &entry.name,
        identity.command(),
        &entry.summary,
        identity.app_id(),
    );
    let metainfo = render::app_metadata(entry, identity.app_id());
    let script = render::launcher_script(identity.app_id());

    tokio::try_join!(
        write_file(paths.metainfo(), metainfo.as_bytes()),
        write_file(paths.desktop(), desktop.as_bytes()),
        write_file(paths.script(), script.as_bytes()),
        write_file(paths.manifest(), manifest.as_bytes()),
    )?;
    make_executable(&paths.script()).await?;

    write_file(paths.apk(), &apk).await?;

    Ok(EntryOutcome::Completed {
        icons: variants.len(),
    })
}

/// Process every catalog entry concurrently and collect one report per entry,
/// in catalog order.
pub async fn package_all<R: Reporter>(
    ctx: &PackageContext<'_, R>,
    catalog: &Catalog,
) -> Vec<EntryReport> {
    let futures = catalog.entries().iter().map(|entry| async move {
        let start = Instant::now();
        let identity = AppIdentity::from_entry(entry);

        let status = match process_entry(ctx, entry).await {
            Ok(EntryOutcome::Skipped) => {
                ctx.reporter.skipped(&identity, "already packaged");
                EntryStatus::Skipped
            }
            Ok(EntryOutcome::Completed { icons }) => {
                ctx.reporter.done(&identity, &format!("{icons} icons"));
                EntryStatus::Completed
            }
            Err(e) => {
                error!(app_id = %identity, "packaging failed: {e}");
                ctx.reporter.failed(&identity, &e.to_string());
                EntryStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        EntryReport {
            app_id: identity.app_id().to_string(),
            status,
            duration: start.elapsed(),
        }
    });

    join_all(futures).await
}
