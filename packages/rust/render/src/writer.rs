//! Writes rendered pages to the output tree.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use salonsite_shared::{Result, SalonSiteError};

use crate::minify::minify_html;

/// Metadata for a single written page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WrittenFile {
    /// Path relative to the output root.
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Write `html` to `output_root/relative`, minifying first when asked.
///
/// Parent directories are created as needed. The file is written to a
/// sibling temp file and renamed into place, so readers never see a
/// half-written page.
pub fn write_page(
    output_root: &Path,
    relative: &Path,
    html: &str,
    minify: bool,
) -> Result<WrittenFile> {
    let target = output_root.join(relative);

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SalonSiteError::io(parent, e))?;
    }

    let content = if minify {
        let minified = minify_html(html);
        debug!(
            before = html.len(),
            after = minified.len(),
            "minified page"
        );
        minified
    } else {
        html.to_string()
    };

    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            SalonSiteError::validation(format!("output path has no file name: {}", target.display()))
        })?;
    let temp = target.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, &content).map_err(|e| SalonSiteError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| SalonSiteError::io(&target, e))?;

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    info!(
        path = %relative.display(),
        size_bytes = content.len(),
        "written"
    );

    Ok(WrittenFile {
        path: relative.to_path_buf(),
        sha256,
        size_bytes: content.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "salonsite-writer-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn write_page_creates_parent_dirs() {
        let tmp = temp_dir();

        let written = write_page(
            &tmp,
            Path::new("stores/indiranagar.html"),
            "<h1>Indiranagar</h1>\n",
            false,
        )
        .unwrap();

        let on_disk = std::fs::read_to_string(tmp.join("stores/indiranagar.html")).unwrap();
        assert_eq!(on_disk, "<h1>Indiranagar</h1>\n");
        assert_eq!(written.size_bytes, on_disk.len());
        assert_eq!(written.path, PathBuf::from("stores/indiranagar.html"));
        assert_eq!(written.sha256.len(), 64);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_page_minifies_when_asked() {
        let tmp = temp_dir();
        let html = "<body>\n    <!-- banner -->\n    <p>Hi    there</p>\n</body>\n";

        let plain = write_page(&tmp, Path::new("plain.html"), html, false).unwrap();
        let small = write_page(&tmp, Path::new("small.html"), html, true).unwrap();

        let content = std::fs::read_to_string(tmp.join("small.html")).unwrap();
        assert!(!content.contains("banner"));
        assert!(content.contains("<p>Hi there</p>"));
        assert!(small.size_bytes < plain.size_bytes);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_page_overwrites_and_leaves_no_temp_files() {
        let tmp = temp_dir();

        write_page(&tmp, Path::new("index.html"), "old", false).unwrap();
        let second = write_page(&tmp, Path::new("index.html"), "new", false).unwrap();
        assert_eq!(std::fs::read_to_string(tmp.join("index.html")).unwrap(), "new");
        assert_eq!(second.size_bytes, 3);

        for entry in std::fs::read_dir(&tmp).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.starts_with('.'), "temp file left behind: {name}");
        }

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn same_content_same_hash() {
        let tmp = temp_dir();

        let a = write_page(&tmp, Path::new("a.html"), "<p>x</p>", false).unwrap();
        let b = write_page(&tmp, Path::new("b.html"), "<p>x</p>", false).unwrap();
        assert_eq!(a.sha256, b.sha256);

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
