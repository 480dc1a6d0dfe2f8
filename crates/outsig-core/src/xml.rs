//! Patcher for the signature's `filelist.xml` sidecar manifest.
//!
//! The manifest lists the resources a saved signature references. Outlook
//! writes the signature image as `image001.jpg`; records pointing at it
//! are redirected to the replacement image path.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::{NsReader, Writer};
use tracing::{debug, info};

use crate::error::{Error, Result, require_non_blank};

/// Office schema namespace used by signature manifests.
const OFFICE_NS: &str = "urn:schemas-microsoft-com:office:office";

/// Legacy image filename Outlook writes into fresh signature manifests.
pub const DEFAULT_IMAGE_FILE: &str = "image001.jpg";

const HREF_ATTR: &str = "HRef";

/// Result of a manifest patch pass.
#[derive(Debug)]
pub struct ManifestUpdate {
    /// Full serialized manifest after the pass, written back or not
    pub xml: String,
    /// True when at least one record was rewritten and the file saved
    pub changed: bool,
}

/// Build the path of a signature's manifest under `signatures_dir`.
pub fn manifest_path(signatures_dir: &Path, base_name: &str) -> PathBuf {
    signatures_dir
        .join(format!("{base_name}_files"))
        .join("filelist.xml")
}

/// Redirect manifest records referencing the default image to `new_image_path`.
///
/// The file is persisted only when a record actually changed; the
/// serialized document is returned either way for diagnostics.
pub fn update_manifest_image(
    signatures_dir: &Path,
    base_name: &str,
    new_image_path: &str,
) -> Result<ManifestUpdate> {
    require_non_blank(base_name, "signature base name")?;
    require_non_blank(new_image_path, "new image path")?;

    let path = manifest_path(signatures_dir, base_name);
    if !path.exists() {
        return Err(Error::FileNotFound(path));
    }

    let xml = fs::read_to_string(&path)?;
    let update = rewrite_file_records(&xml, new_image_path)?;

    if update.changed {
        fs::write(&path, update.xml.as_bytes())?;
        info!("Updated image references in {}", path.display());
    } else {
        debug!("No matching image references in {}", path.display());
    }

    Ok(update)
}

/// How `File` records are recognized in a manifest.
///
/// Real manifests are inconsistent about the office namespace, so the
/// lookups are tried in order and the first one matching any record wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileLookup {
    /// `File` resolved under the office schema namespace
    OfficeNamespace,
    /// Unqualified `<File>` tag
    PlainName,
    /// Literal `<o:File>` tag with no namespace declaration
    PrefixedName,
}

const LOOKUPS: [FileLookup; 3] = [
    FileLookup::OfficeNamespace,
    FileLookup::PlainName,
    FileLookup::PrefixedName,
];

impl FileLookup {
    fn matches(self, resolve: &ResolveResult<'_>, elem: &BytesStart<'_>) -> bool {
        match self {
            Self::OfficeNamespace => {
                elem.local_name().as_ref() == b"File"
                    && matches!(resolve, ResolveResult::Bound(ns) if ns.0 == OFFICE_NS.as_bytes())
            }
            Self::PlainName => elem.name().as_ref() == b"File",
            Self::PrefixedName => elem.name().as_ref() == b"o:File",
        }
    }
}

/// Pick the first lookup strategy that matches any record in the document.
fn choose_lookup(xml: &str) -> Result<Option<FileLookup>> {
    let mut counts = [0usize; 3];
    let mut reader = NsReader::from_str(xml);

    loop {
        let (resolve, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(e) | Event::Empty(e) => {
                for (lookup, count) in LOOKUPS.iter().zip(counts.iter_mut()) {
                    if lookup.matches(&resolve, &e) {
                        *count += 1;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(LOOKUPS
        .into_iter()
        .zip(counts)
        .find(|(_, count)| *count > 0)
        .map(|(lookup, _)| lookup))
}

/// Pure transform: redirect matching records, leave everything else as-is.
fn rewrite_file_records(xml: &str, new_image_path: &str) -> Result<ManifestUpdate> {
    let Some(lookup) = choose_lookup(xml)? else {
        return Ok(ManifestUpdate {
            xml: xml.to_string(),
            changed: false,
        });
    };

    let mut reader = NsReader::from_str(xml);
    let mut writer = Writer::new(Vec::new());
    let mut changed = false;

    loop {
        let (resolve, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(e) if lookup.matches(&resolve, &e) => {
                let e = rewrite_href(&e, new_image_path, &mut changed)?;
                writer.write_event(Event::Start(e))?;
            }
            Event::Empty(e) if lookup.matches(&resolve, &e) => {
                let e = rewrite_href(&e, new_image_path, &mut changed)?;
                writer.write_event(Event::Empty(e))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    let xml = String::from_utf8(writer.into_inner())?;
    Ok(ManifestUpdate { xml, changed })
}

fn rewrite_href(
    elem: &BytesStart<'_>,
    new_image_path: &str,
    changed: &mut bool,
) -> Result<BytesStart<'static>> {
    let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);

    for attr in elem.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == HREF_ATTR.as_bytes()
            && references_default_image(&attr.unescape_value()?)
        {
            out.push_attribute((HREF_ATTR, new_image_path));
            *changed = true;
        } else {
            out.push_attribute(attr);
        }
    }

    Ok(out)
}

fn references_default_image(href: &str) -> bool {
    href.to_ascii_lowercase().contains(DEFAULT_IMAGE_FILE)
}
