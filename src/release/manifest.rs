//! Package.appxmanifest version stamping
//!
//! The manifest's `<Identity Version="...">` attribute must carry a four-part
//! version. We locate the Identity element with an XML pull parser and rewrite the
//! attribute value inside that element's byte span only, so the rest of the file
//! is preserved byte for byte.

use crate::core::context::ProjectContext;
use crate::core::error::{ResultExt, ShipResult};
use crate::release::version::ProductVersion;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use std::fs;
use std::ops::Range;
use std::sync::LazyLock;

static IDENTITY_VERSION_ATTR: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"\sVersion\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex"));

static ANY_VERSION_ATTR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"Version="[^"]*""#).expect("valid regex"));

/// How a manifest update went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestUpdate {
  /// `<Identity Version>` rewritten
  Identity,
  /// No usable Identity element; first `Version="..."` in the document rewritten
  Fallback,
  /// No version attribute anywhere; file left untouched
  Unchanged,
  /// Manifest file does not exist
  Missing,
}

/// Stamp the manifest with the four-part form of `version`
///
/// A missing manifest or a manifest without any version attribute is not an
/// error; the caller decides how loudly to report it.
pub fn update_manifest_version(ctx: &ProjectContext, version: &ProductVersion) -> ShipResult<ManifestUpdate> {
  let path = ctx.manifest_path();
  if !path.exists() {
    return Ok(ManifestUpdate::Missing);
  }

  let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
  let manifest_version = version.manifest_form();

  let Some((updated, how)) = rewrite_manifest_version(&content, &manifest_version) else {
    return Ok(ManifestUpdate::Unchanged);
  };

  fs::write(&path, updated).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(how)
}

/// Rewrite the Identity version in `content`. Returns None when nothing matched.
pub fn rewrite_manifest_version(content: &str, manifest_version: &str) -> Option<(String, ManifestUpdate)> {
  if let Some(span) = identity_version_span(content) {
    return Some((splice(content, span, manifest_version), ManifestUpdate::Identity));
  }

  let m = ANY_VERSION_ATTR.find(content)?;
  let replacement = format!("Version=\"{}\"", manifest_version);
  Some((splice(content, m.range(), &replacement), ManifestUpdate::Fallback))
}

/// Byte range of the value of the first `<Identity>` element's Version attribute
fn identity_version_span(content: &str) -> Option<Range<usize>> {
  let mut reader = Reader::from_str(content);

  loop {
    let start = usize::try_from(reader.buffer_position()).ok()?;
    let event = reader.read_event().ok()?;
    let end = usize::try_from(reader.buffer_position()).ok()?;

    match event {
      Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Identity" => {
        let has_version = e
          .attributes()
          .filter_map(Result::ok)
          .any(|attr| attr.key.local_name().as_ref() == b"Version");
        if !has_version {
          return None;
        }

        let element = content.get(start..end)?;
        let caps = IDENTITY_VERSION_ATTR.captures(element)?;
        let value = caps.get(1).or_else(|| caps.get(2))?;
        return Some(start + value.start()..start + value.end());
      }
      Event::Eof => return None,
      _ => {}
    }
  }
}

fn splice(content: &str, range: Range<usize>, replacement: &str) -> String {
  let mut out = String::with_capacity(content.len() + replacement.len());
  out.push_str(&content[..range.start]);
  out.push_str(replacement);
  out.push_str(&content[range.end..]);
  out
}
