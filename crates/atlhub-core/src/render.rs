//! Text artifact templates: desktop entry, launcher script and `AppStream`
//! metainfo.
//!
//! All functions are pure. The desktop entry and launcher script go through
//! [`strip_template`] so their bytes match what earlier releases shipped.

use atlhub_schema::CatalogEntry;

/// Upstream issue tracker advertised in every metainfo file.
pub const BUG_TRACKER_URL: &str = "https://github.com/radmorecameron/atl_hub/issues";

/// Category every packaged app is filed under.
pub const CATEGORY: &str = "Education";

/// Android Translation Layer entry point inside the base app.
pub const ATL_BINARY: &str = "android-translation-layer";

/// Minimum display edge, in logical pixels, declared in the metainfo.
pub const MIN_DISPLAY_LENGTH: u32 = 360;

/// Normalize an indented template.
///
/// Removes every run of exactly four spaces (non-overlapping, left to right),
/// then trims leading whitespace. This is not a dedent: it also applies to
/// interpolated values and to runs inside a line.
pub fn strip_template(text: &str) -> String {
    text.replace("    ", "").trim_start().to_string()
}

/// Render the `.desktop` entry.
pub fn desktop_entry(name: &str, command: &str, summary: &str, app_id: &str) -> String {
    strip_template(&format!(
        "
        [Desktop Entry]
        Type=Application
        Name={name}
        Exec={command}.sh --uri %u
        Comment={summary}
        X-Purism-FormFactor=Workstation;Mobile;
        Icon={app_id}
    "
    ))
}

/// Render the launcher installed as `/app/bin/<command>.sh`.
pub fn launcher_script(app_id: &str) -> String {
    strip_template(&format!(
        "
        #!/bin/sh
        export ATL_UGLY_ENABLE_WEBVIEW=
        exec {ATL_BINARY} --gapplication-app-id={app_id} /app/share/{app_id}.apk $@
        "
    ))
}

/// Render the `AppStream` metainfo XML.
///
/// `donations` and `translations` produce a `<url>` element only when the
/// field is present. A present but empty string still yields an element.
pub fn app_metadata(entry: &CatalogEntry, app_id: &str) -> String {
    let id = escape_xml(app_id);
    let name = escape_xml(&entry.name);
    let summary = escape_xml(&entry.summary);
    let license = escape_xml(&entry.license);

    let mut urls = format!("  <url type=\"bugtracker\">{BUG_TRACKER_URL}</url>\n");
    if let Some(donations) = &entry.donations {
        urls.push_str(&format!(
            "  <url type=\"donation\">{}</url>\n",
            escape_xml(donations)
        ));
    }
    if let Some(translations) = &entry.translations {
        urls.push_str(&format!(
            "  <url type=\"translate\">{}</url>\n",
            escape_xml(translations)
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<component type="desktop-application">
  <id>{id}</id>
  <name>{name} (unofficial port)</name>
  <summary>{summary}</summary>
  <project_license>{license}</project_license>
  <metadata_license>CC0-1.0</metadata_license>
  <categories>
    <category>{CATEGORY}</category>
  </categories>
{urls}  <description>
    <p><em>NOTE:</em> This is an unofficial and experimental Flatpak build based on Android Translation Layer.</p>
    <p>{summary}</p>
  </description>
  <launchable type="desktop-id">{id}.desktop</launchable>
  <supports>
    <control>pointing</control>
    <control>keyboard</control>
    <control>touch</control>
  </supports>
  <requires>
    <display_length compare="ge">{MIN_DISPLAY_LENGTH}</display_length>
  </requires>
  <developer id="{id}">
    <name>Packaged by ATLHub</name>
  </developer>
</component>
"#
    )
}

/// Escape text for use in XML element content and double-quoted attributes.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> CatalogEntry {
        CatalogEntry {
            id: "foo".to_string(),
            name: "Foo App".to_string(),
            summary: "S".to_string(),
            license: "MIT".to_string(),
            apk_file: "https://example.com/foo.apk".to_string(),
            icon: "https://example.com/foo.png".to_string(),
            donations: None,
            translations: None,
            repo: None,
            should_update: None,
        }
    }

    #[test]
    fn test_strip_template_rule() {
        assert_eq!(strip_template("\n        a\n    b\n    "), "a\nb\n");
        // Runs of five keep one space; runs of three are untouched.
        assert_eq!(strip_template("x     y   z"), "x y   z");
        // Leading tabs and newlines are trimmed too.
        assert_eq!(strip_template("\n\t  a"), "a");
    }

    #[test]
    fn test_desktop_entry_exact() {
        let text = desktop_entry("Foo App", "foo app", "S", "foo_unofficial");
        assert_eq!(
            text,
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=Foo App\n\
             Exec=foo app.sh --uri %u\n\
             Comment=S\n\
             X-Purism-FormFactor=Workstation;Mobile;\n\
             Icon=foo_unofficial\n"
        );
    }

    #[test]
    fn test_desktop_entry_strips_interpolated_runs() {
        let text = desktop_entry("Wide    Name", "wide    name", "S", "w_unofficial");
        assert!(text.contains("Name=WideName\n"));
        assert!(text.contains("Exec=widename.sh --uri %u\n"));
    }

    #[test]
    fn test_launcher_script_exact() {
        assert_eq!(
            launcher_script("foo_unofficial"),
            "#!/bin/sh\n\
             export ATL_UGLY_ENABLE_WEBVIEW=\n\
             exec android-translation-layer --gapplication-app-id=foo_unofficial \
             /app/share/foo_unofficial.apk $@\n"
        );
    }

    #[test]
    fn test_metadata_optional_urls() {
        let mut e = entry();
        e.translations = Some("https://x".to_string());

        let xml = app_metadata(&e, "foo_unofficial");
        assert!(!xml.contains(r#"<url type="donation">"#));
        assert_eq!(
            xml.matches(r#"<url type="translate">https://x</url>"#).count(),
            1
        );
        assert_eq!(xml.matches(r#"<url type="translate">"#).count(), 1);
    }

    #[test]
    fn test_metadata_empty_string_is_present() {
        let mut e = entry();
        e.donations = Some(String::new());
        let xml = app_metadata(&e, "foo_unofficial");
        assert!(xml.contains(r#"<url type="donation"></url>"#));
    }

    #[test]
    fn test_metadata_fixed_content() {
        let xml = app_metadata(&entry(), "foo_unofficial");
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains("<id>foo_unofficial</id>"));
        assert!(xml.contains("<name>Foo App (unofficial port)</name>"));
        assert!(xml.contains("<project_license>MIT</project_license>"));
        assert!(xml.contains("<category>Education</category>"));
        assert!(xml.contains(&format!(r#"<url type="bugtracker">{BUG_TRACKER_URL}</url>"#)));
        assert!(
            xml.contains(r#"<launchable type="desktop-id">foo_unofficial.desktop</launchable>"#)
        );
        assert!(xml.contains(r#"<display_length compare="ge">360</display_length>"#));
        assert!(xml.contains(r#"<developer id="foo_unofficial">"#));
        for control in ["pointing", "keyboard", "touch"] {
            assert!(xml.contains(&format!("<control>{control}</control>")));
        }
    }

    #[test]
    fn test_metadata_escapes_text() {
        let mut e = entry();
        e.name = "Tom & Jerry <3".to_string();
        let xml = app_metadata(&e, "tj_unofficial");
        assert!(xml.contains("<name>Tom &amp; Jerry &lt;3 (unofficial port)</name>"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let e = entry();
        assert_eq!(
            app_metadata(&e, "foo_unofficial"),
            app_metadata(&e, "foo_unofficial")
        );
        assert_eq!(
            desktop_entry("Foo App", "foo app", "S", "foo_unofficial"),
            desktop_entry("Foo App", "foo app", "S", "foo_unofficial")
        );
        assert_eq!(launcher_script("foo_unofficial"), launcher_script("foo_unofficial"));
    }
}
