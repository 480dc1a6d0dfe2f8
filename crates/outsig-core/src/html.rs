//! Patcher for the signature's HTML document.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use lol_html::{HtmlRewriter, Settings, element};
use tracing::info;

use crate::error::{Error, Result, require_non_blank};

/// Build the path of a signature's HTML document under `signatures_dir`.
///
/// Fails when the name is blank or the file does not exist.
pub fn signature_html_path(signatures_dir: &Path, signature_name: &str) -> Result<PathBuf> {
    require_non_blank(signature_name, "signature name")?;

    let path = signatures_dir.join(format!("{signature_name}.htm"));
    if !path.exists() {
        return Err(Error::FileNotFound(path));
    }
    Ok(path)
}

/// Point the document's image at `new_image_path`.
///
/// Only the first `<img>` element in document order is touched; the rest
/// of the byte stream passes through untouched. Returns `false` without
/// writing when the document has no image at all.
pub fn set_image_source(html_path: &Path, new_image_path: &str) -> Result<bool> {
    require_non_blank(&html_path.to_string_lossy(), "HTML file path")?;
    require_non_blank(new_image_path, "new image path")?;

    if !html_path.exists() {
        return Err(Error::FileNotFound(html_path.to_path_buf()));
    }

    let html = fs::read(html_path)?;
    let (patched, output) = rewrite_image_source(&html, new_image_path)?;

    if patched {
        fs::write(html_path, output)?;
    } else {
        info!("No <img> element found in {}", html_path.display());
    }

    Ok(patched)
}

fn rewrite_image_source(html: &[u8], new_image_path: &str) -> Result<(bool, Vec<u8>)> {
    let patched = Cell::new(false);
    let mut output = Vec::with_capacity(html.len());

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("img", |el| {
                if !patched.get() {
                    el.set_attribute("src", new_image_path)?;
                    patched.set(true);
                }
                Ok(())
            })],
            ..Settings::default()
        },
        |chunk: &[u8]| output.extend_from_slice(chunk),
    );
    rewriter.write(html)?;
    rewriter.end()?;

    Ok((patched.get(), output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SIGNATURE_HTML: &str = concat!(
        "<html><body>\n",
        "<p>Kind regards,<br>Alice</p>\n",
        "<img src=\"old/image001.jpg\" alt=\"logo\">\n",
        "</body></html>\n",
    );

    fn write_signature(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(format!("{name}.htm"));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn html_path_for_existing_signature() {
        let dir = TempDir::new().unwrap();
        let expected = write_signature(&dir, "Alice", SIGNATURE_HTML);

        let path = signature_html_path(dir.path(), "Alice").unwrap();
        assert_eq!(path, expected);
    }

    #[test]
    fn html_path_rejects_blank_name() {
        let dir = TempDir::new().unwrap();
        let result = signature_html_path(dir.path(), "  ");
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn html_path_for_missing_signature() {
        let dir = TempDir::new().unwrap();
        let result = signature_html_path(dir.path(), "Nobody");
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn patches_image_source() {
        let dir = TempDir::new().unwrap();
        let path = write_signature(&dir, "Alice", SIGNATURE_HTML);

        let patched = set_image_source(&path, r"\\server\share\new.jpg").unwrap();
        assert!(patched);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#"src="\\server\share\new.jpg""#));
        assert!(!content.contains("old/image001.jpg"));
        // Everything around the attribute is untouched.
        assert!(content.contains("<p>Kind regards,<br>Alice</p>"));
        assert!(content.contains(r#"alt="logo""#));
    }

    #[test]
    fn patches_only_the_first_image() {
        let dir = TempDir::new().unwrap();
        let path = write_signature(
            &dir,
            "Alice",
            "<img src=\"first.jpg\"><img src=\"second.jpg\">",
        );

        set_image_source(&path, "new.jpg").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#"src="new.jpg""#));
        assert!(content.contains(r#"src="second.jpg""#));
        assert!(!content.contains("first.jpg"));
    }

    #[test]
    fn patching_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write_signature(&dir, "Alice", SIGNATURE_HTML);

        set_image_source(&path, "new.jpg").unwrap();
        let first = fs::read(&path).unwrap();

        set_image_source(&path, "new.jpg").unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn document_without_image_is_left_untouched() {
        let dir = TempDir::new().unwrap();
        let original = "<html><body><p>plain text signature</p></body></html>";
        let path = write_signature(&dir, "Alice", original);

        let patched = set_image_source(&path, "new.jpg").unwrap();
        assert!(!patched);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn blank_arguments_are_rejected_before_io() {
        let dir = TempDir::new().unwrap();
        let original = SIGNATURE_HTML;
        let path = write_signature(&dir, "Alice", original);

        let result = set_image_source(&path, "   ");
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);

        let result = set_image_source(Path::new(""), "new.jpg");
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = set_image_source(&dir.path().join("gone.htm"), "new.jpg");
        assert!(result.unwrap_err().is_not_found());
    }
}
