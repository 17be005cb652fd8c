//! Flatpak manifest model consumed by `flatpak-builder`.
//!
//! Field order in the structs is the key order of the serialized YAML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::AppIdentity;

/// Runtime every app is built against.
pub const RUNTIME: &str = "org.gnome.Platform";
/// Runtime branch.
pub const RUNTIME_VERSION: &str = "48";
/// SDK used to build.
pub const SDK: &str = "org.gnome.Platform";
/// Base app providing the Android Translation Layer.
pub const BASE_APP: &str = "io.gitlab.android_translation_layer.BaseApp";
/// Branch of [`BASE_APP`].
pub const BASE_VERSION: &str = "stable";
/// Codec extension mounted for media playback.
pub const FFMPEG_EXTENSION: &str = "org.freedesktop.Platform.ffmpeg-full";
/// Branch of [`FFMPEG_EXTENSION`].
pub const FFMPEG_EXTENSION_VERSION: &str = "24.08";

/// Sandbox permissions granted to every app.
pub const FINISH_ARGS: [&str; 6] = [
    "--share=network",
    "--share=ipc",
    "--socket=wayland",
    "--socket=fallback-x11",
    "--device=dri",
    "--socket=pulseaudio",
];

/// Number of non-icon entries in the build module (apk, metainfo, desktop, script).
pub const FIXED_MODULE_ENTRIES: usize = 4;

/// Index in `build-commands` and `sources` at which icon entries start.
const ICON_INSERT_POSITION: usize = 2;

/// Root of a Flatpak manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct FlatpakManifest {
    /// Application id.
    pub app_id: String,
    /// Runtime reference.
    pub runtime: String,
    /// Runtime branch.
    pub runtime_version: String,
    /// SDK reference.
    pub sdk: String,
    /// Base app reference.
    pub base: String,
    /// Base app branch.
    pub base_version: String,
    /// Command launched by `flatpak run`.
    pub command: String,
    /// Sandbox permissions.
    pub finish_args: Vec<String>,
    /// Extension points, keyed by extension id.
    pub add_extensions: BTreeMap<String, Extension>,
    /// Shell commands run after all modules are built.
    pub cleanup_commands: Vec<String>,
    /// Build modules.
    pub modules: Vec<Module>,
}

/// An `add-extensions` declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Extension {
    /// Extension branch.
    pub version: String,
    /// Mount directory, relative to `/app`.
    pub directory: String,
    /// Library path added to the loader search path.
    pub add_ld_path: String,
    /// Skip automatic download on install.
    pub no_autodownload: bool,
    /// Remove together with the app.
    pub autodelete: bool,
}

/// A build module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Module {
    /// Module name.
    pub name: String,
    /// Build system (always `simple` here).
    pub buildsystem: String,
    /// Install commands, in execution order.
    pub build_commands: Vec<String>,
    /// Files copied into the build directory.
    pub sources: Vec<Source>,
}

/// Kind of a module source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A single local file.
    File,
}

/// A module source entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    /// Source kind.
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Path relative to the manifest.
    pub path: String,
}

impl Source {
    /// A `type: file` source.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::File,
            path: path.into(),
        }
    }
}

impl FlatpakManifest {
    /// Assemble the complete manifest for an app in one pass.
    ///
    /// Icon entries occupy a contiguous block starting at index 2 of both
    /// `build-commands` and `sources`, ordered so that the last size in
    /// `icon_sizes` comes first. Everything else is fixed:
    ///
    /// - build-commands: apk, script, icons, desktop, metainfo
    /// - sources: apk, metainfo, icons, desktop, script
    pub fn for_app(identity: &AppIdentity, icon_sizes: &[u32]) -> Self {
        let app_id = identity.app_id();
        let command = identity.command();
        let apk = identity.apk_file_name();
        let script = identity.script_file_name();
        let desktop = identity.desktop_file_name();
        let metainfo = identity.metainfo_file_name();

        let icon_commands = icon_sizes.iter().rev().map(|&size| {
            format!(
                "install -D {} {}",
                identity.icon_file_name(size),
                icon_install_path(app_id, size)
            )
        });
        let icon_sources = icon_sizes
            .iter()
            .rev()
            .map(|&size| Source::file(identity.icon_file_name(size)));

        let mut build_commands = Vec::with_capacity(FIXED_MODULE_ENTRIES + icon_sizes.len());
        build_commands.push(format!("install -D {apk} /app/share/{apk}"));
        build_commands.push(format!("install -D {script} /app/bin/{script}"));
        debug_assert_eq!(build_commands.len(), ICON_INSERT_POSITION);
        build_commands.extend(icon_commands);
        build_commands.push(format!(
            "install -D {desktop} /app/share/applications/{desktop}"
        ));
        build_commands.push(format!(
            "install -D {metainfo} /app/share/metainfo/{metainfo}"
        ));

        let mut sources = Vec::with_capacity(FIXED_MODULE_ENTRIES + icon_sizes.len());
        sources.push(Source::file(apk));
        sources.push(Source::file(metainfo));
        debug_assert_eq!(sources.len(), ICON_INSERT_POSITION);
        sources.extend(icon_sources);
        sources.push(Source::file(desktop));
        sources.push(Source::file(script.clone()));

        let mut add_extensions = BTreeMap::new();
        add_extensions.insert(
            FFMPEG_EXTENSION.to_string(),
            Extension {
                version: FFMPEG_EXTENSION_VERSION.to_string(),
                directory: "lib/ffmpeg".to_string(),
                add_ld_path: ".".to_string(),
                no_autodownload: false,
                autodelete: false,
            },
        );

        Self {
            app_id: app_id.to_string(),
            runtime: RUNTIME.to_string(),
            runtime_version: RUNTIME_VERSION.to_string(),
            sdk: SDK.to_string(),
            base: BASE_APP.to_string(),
            base_version: BASE_VERSION.to_string(),
            command: script,
            finish_args: FINISH_ARGS.iter().map(ToString::to_string).collect(),
            add_extensions,
            cleanup_commands: vec!["mkdir -p ${FLATPAK_DEST}/lib/ffmpeg".to_string()],
            modules: vec![Module {
                name: command.to_string(),
                buildsystem: "simple".to_string(),
                build_commands,
                sources,
            }],
        }
    }
}

/// Hicolor theme path an icon of `size` is installed to.
pub fn icon_install_path(app_id: &str, size: u32) -> String {
    format!("/app/share/icons/hicolor/{size}x{size}/apps/{app_id}.png")
}
