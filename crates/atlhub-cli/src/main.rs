//! `atlhub` - Flatpak packaging pipeline for Android Translation Layer apps.
//!
//! `atlhub package` turns the APK catalog into per-app Flatpak sources under
//! `apps/`. `atlhub publish` builds those into the shared repository and
//! writes single-file bundles.

mod reporter;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use atlhub_core::config::FLATHUB_RUNTIME_REPO;
use atlhub_core::io::fetch::build_client;
use atlhub_core::package::{EntryStatus, PackageContext, RunSummary, package_all};
use atlhub_core::paths::{
    DEFAULT_APPS_DIR, DEFAULT_BUILD_DIR, DEFAULT_BUNDLE_DIR, DEFAULT_CATALOG, DEFAULT_REPO_DIR,
};
use atlhub_core::publish::{Toolchain, publish};
use atlhub_core::{PackageConfig, PublishConfig, Reporter};
use atlhub_schema::Catalog;

use crate::reporter::ConsoleReporter;

#[derive(Debug, Parser)]
#[command(name = "atlhub")]
#[command(
    author,
    version,
    about = "Package Android apps as Flatpaks for the Android Translation Layer"
)]
struct Cli {
    /// Root of the per-app output directories
    #[arg(long, global = true, env = "ATLHUB_APPS_DIR", default_value = DEFAULT_APPS_DIR)]
    apps_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch assets and generate Flatpak sources for every catalog entry
    Package {
        /// APK catalog (JSON array)
        #[arg(long, env = "ATLHUB_CATALOG", default_value = DEFAULT_CATALOG)]
        catalog: PathBuf,
        /// Only process the entry with this id
        #[arg(short, long)]
        filter: Option<String>,
        /// Exit non-zero if any entry fails
        #[arg(long)]
        strict: bool,
    },
    /// Build every packaged app into the repository and export bundles
    Publish {
        /// flatpak-builder build directories
        #[arg(long, env = "ATLHUB_BUILD_DIR", default_value = DEFAULT_BUILD_DIR)]
        build_dir: PathBuf,
        /// Shared Flatpak repository
        #[arg(long, env = "ATLHUB_REPO_DIR", default_value = DEFAULT_REPO_DIR)]
        repo_dir: PathBuf,
        /// Output directory for .flatpak bundles
        #[arg(long, env = "ATLHUB_BUNDLE_DIR", default_value = DEFAULT_BUNDLE_DIR)]
        bundle_dir: PathBuf,
        /// Runtime repository referenced by bundles
        #[arg(long, env = "ATLHUB_RUNTIME_REPO", default_value = FLATHUB_RUNTIME_REPO)]
        runtime_repo: String,
        /// Stop at the first failing app
        #[arg(long)]
        halt_on_error: bool,
        /// Only publish the app with this app id
        #[arg(short, long)]
        filter: Option<String>,
        /// flatpak-builder executable
        #[arg(long, env = "ATLHUB_FLATPAK_BUILDER", default_value = "flatpak-builder")]
        builder: PathBuf,
        /// flatpak executable
        #[arg(long, env = "ATLHUB_FLATPAK", default_value = "flatpak")]
        flatpak: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Package {
            catalog,
            filter,
            strict,
        } => run_package(cli.apps_dir, &catalog, filter.as_deref(), strict).await?,
        Commands::Publish {
            build_dir,
            repo_dir,
            bundle_dir,
            runtime_repo,
            halt_on_error,
            filter,
            builder,
            flatpak,
        } => {
            let config = PublishConfig {
                apps_dir: cli.apps_dir,
                build_dir,
                repo_dir,
                bundle_dir,
                runtime_repo,
                halt_on_error,
                builder_bin: builder,
                flatpak_bin: flatpak,
            };
            run_publish(&config, filter.as_deref()).await?
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Returns `false` when the run should exit non-zero.
async fn run_package(
    apps_dir: PathBuf,
    catalog_path: &Path,
    filter: Option<&str>,
    strict: bool,
) -> Result<bool> {
    let start = Instant::now();
    let reporter = ConsoleReporter;

    let mut catalog = Catalog::load(catalog_path)?;
    if let Some(id) = filter {
        catalog.retain_id(id);
    }
    info!("{} catalog entries from {}", catalog.len(), catalog_path.display());

    tokio::fs::create_dir_all(&apps_dir)
        .await
        .with_context(|| format!("failed to create {}", apps_dir.display()))?;

    let config = PackageConfig {
        apps_dir,
        ..PackageConfig::default()
    };
    let client = build_client().context("failed to build HTTP client")?;
    let ctx = PackageContext::new(&client, &config, &reporter);

    reporter.section("Packaging");
    let reports = package_all(&ctx, &catalog).await;
    let summary = RunSummary::from_reports(&reports);

    let failed: Vec<_> = reports
        .iter()
        .filter_map(|r| match &r.status {
            EntryStatus::Failed { reason } => Some((r.app_id.as_str(), reason.as_str())),
            _ => None,
        })
        .collect();
    if !failed.is_empty() {
        println!();
        println!("  failed");
        for (app_id, reason) in &failed {
            println!("    {app_id}: {reason}");
        }
    }

    reporter.summary(
        summary.built,
        summary.skipped,
        summary.failed,
        start.elapsed().as_secs_f64(),
    );

    let all_failed = summary.total() > 0 && summary.failed == summary.total();
    Ok(!(all_failed || (strict && summary.failed > 0)))
}

/// Returns `false` when the run should exit non-zero.
async fn run_publish(config: &PublishConfig, filter: Option<&str>) -> Result<bool> {
    let start = Instant::now();
    let reporter = ConsoleReporter;

    let toolchain = Toolchain::locate(config)?;
    info!(
        "using {} and {}",
        toolchain.builder().display(),
        toolchain.flatpak().display()
    );

    reporter.section("Publishing");
    let report = publish(config, &toolchain, &reporter, filter).await?;

    if report.results.is_empty() {
        reporter.info(&format!("no packaged apps in {}", config.apps_dir.display()));
    }
    for r in report.results.iter().filter(|r| r.error.is_none()) {
        println!("    built {} ({:.1}s)", r.app_id, r.duration.as_secs_f64());
    }
    for r in report.results.iter().filter(|r| r.error.is_some()) {
        println!("    failed {}", r.app_id);
    }
    reporter.summary(
        report.built(),
        0,
        report.failed(),
        start.elapsed().as_secs_f64(),
    );

    Ok(report.is_success())
}
