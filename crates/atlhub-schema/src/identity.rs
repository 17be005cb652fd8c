//! Packaged app identity and the per-app file names derived from it.

use crate::CatalogEntry;

/// Suffix appended to a catalog id to form the packaged app id.
pub const APP_ID_SUFFIX: &str = "_unofficial";

/// Identifiers derived from a [`CatalogEntry`], plus the file names that are
/// built from them.
///
/// # Example
///
/// ```
/// use atlhub_schema::AppIdentity;
///
/// let identity = AppIdentity::new("org.example.foo", "Foo App");
/// assert_eq!(identity.app_id(), "org.example.foo_unofficial");
/// assert_eq!(identity.script_file_name(), "foo app.sh");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppIdentity {
    app_id: String,
    command: String,
}

impl AppIdentity {
    /// Derive the identity from a raw catalog id and display name.
    ///
    /// The command name is the display name lowercased, kept verbatim
    /// otherwise (spaces included).
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            app_id: format!("{id}{APP_ID_SUFFIX}"),
            command: name.to_lowercase(),
        }
    }

    /// Derive the identity of a catalog entry.
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        Self::new(&entry.id, &entry.name)
    }

    /// Build the identity of an already packaged app from its directory
    /// name, which is the app id itself. The command name is unknown in
    /// that case and left empty.
    pub fn from_app_id(app_id: &str) -> Self {
        Self {
            app_id: app_id.to_string(),
            command: String::new(),
        }
    }

    /// Packaged application id (e.g. `org.example.foo_unofficial`).
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Lowercased command name.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// `<app_id>.apk`
    pub fn apk_file_name(&self) -> String {
        format!("{}.apk", self.app_id)
    }

    /// `<app_id>_icon_<N>x<N>.png`
    pub fn icon_file_name(&self, size: u32) -> String {
        format!("{}_icon_{size}x{size}.png", self.app_id)
    }

    /// `<app_id>.desktop`
    pub fn desktop_file_name(&self) -> String {
        format!("{}.desktop", self.app_id)
    }

    /// `<app_id>.metainfo.xml`
    pub fn metainfo_file_name(&self) -> String {
        format!("{}.metainfo.xml", self.app_id)
    }

    /// `<command>.sh`
    pub fn script_file_name(&self) -> String {
        format!("{}.sh", self.command)
    }

    /// `<app_id>.yml`
    pub fn manifest_file_name(&self) -> String {
        format!("{}.yml", self.app_id)
    }

    /// `<app_id>.flatpak`
    pub fn bundle_file_name(&self) -> String {
        format!("{}.flatpak", self.app_id)
    }
}

impl std::fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.app_id)
    }
}
