//! Referenced asset staging
//!
//! Front-matter fields and in-body image references point at files next to
//! the markdown source. The store hashes each referenced file, assigns it a
//! content-addressed name under the public assets directory, and hands back
//! the rewritten URL. Actual copying happens in one `flush` after the whole
//! pass validated.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// File extensions an image field accepts
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "avif", "svg"];

/// Characters percent-encoded in asset URLs
const URL_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'?')
    .add(b'<')
    .add(b'>')
    .add(b'%');

/// Errors from resolving a referenced file
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("referenced file `{0}` does not exist")]
    Missing(PathBuf),
    #[error("`{0}` is not a recognized image format")]
    NotAnImage(PathBuf),
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Stages referenced files for copying into the public assets directory
#[derive(Debug)]
pub struct AssetStore {
    assets_dir: PathBuf,
    base: String,
    /// Source path -> content-hashed file name
    staged: HashMap<PathBuf, String>,
}

impl AssetStore {
    pub fn new(assets_dir: PathBuf, base: &str) -> Self {
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        Self {
            assets_dir,
            base,
            staged: HashMap::new(),
        }
    }

    /// Resolve a reference made from a markdown file
    ///
    /// `/`-rooted references resolve against the content root, everything
    /// else against the referencing file's directory.
    pub fn resolve(content_dir: &Path, file_dir: &Path, reference: &str) -> PathBuf {
        match reference.strip_prefix('/') {
            Some(rooted) => content_dir.join(rooted),
            None => file_dir.join(reference),
        }
    }

    /// Stage a file and return its public URL
    pub fn stage(&mut self, source: &Path) -> Result<String, AssetError> {
        if let Some(name) = self.staged.get(source) {
            return Ok(self.url_for(name));
        }

        if !source.is_file() {
            return Err(AssetError::Missing(source.to_path_buf()));
        }

        let bytes = fs::read(source).map_err(|e| AssetError::Io {
            path: source.to_path_buf(),
            source: e,
        })?;

        let digest = Sha256::digest(&bytes);
        let hash: String = digest.iter().take(4).map(|b| format!("{:02x}", b)).collect();
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("asset");
        let name = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}-{}.{}", stem, hash, ext),
            None => format!("{}-{}", stem, hash),
        };

        let url = self.url_for(&name);
        self.staged.insert(source.to_path_buf(), name);
        Ok(url)
    }

    /// Stage an image field, enforcing a known image extension
    pub fn stage_image(&mut self, source: &Path) -> Result<String, AssetError> {
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => self.stage(source),
            _ => Err(AssetError::NotAnImage(source.to_path_buf())),
        }
    }

    /// Number of files currently staged
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Copy every staged file into the assets directory
    pub fn flush(&self) -> anyhow::Result<usize> {
        if self.staged.is_empty() {
            return Ok(0);
        }

        fs::create_dir_all(&self.assets_dir)?;
        for (source, name) in &self.staged {
            fs::copy(source, self.assets_dir.join(name))?;
        }
        Ok(self.staged.len())
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}{}", self.base, utf8_percent_encode(name, URL_UNSAFE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> AssetStore {
        AssetStore::new(dir.path().join("public/static"), "/static/")
    }

    #[test]
    fn test_stage_names_by_content_hash() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("photo.png"), b"not really a png").unwrap();

        let mut assets = store(&dir);
        let url = assets.stage(&dir.path().join("photo.png")).unwrap();

        assert!(url.starts_with("/static/photo-"));
        assert!(url.ends_with(".png"));
        // 8 hex chars between stem and extension
        let name = url.rsplit('/').next().unwrap();
        let hash = name
            .strip_prefix("photo-")
            .unwrap()
            .strip_suffix(".png")
            .unwrap();
        assert_eq!(hash.len(), 8);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_stage_is_deterministic_and_deduplicated() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.jpg"), b"bytes").unwrap();

        let mut assets = store(&dir);
        let first = assets.stage(&dir.path().join("a.jpg")).unwrap();
        let second = assets.stage(&dir.path().join("a.jpg")).unwrap();
        assert_eq!(first, second);
        assert_eq!(assets.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut assets = store(&dir);
        assert!(matches!(
            assets.stage(&dir.path().join("nope.png")),
            Err(AssetError::Missing(_))
        ));
    }

    #[test]
    fn test_image_extension_enforced() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("doc.pdf"), b"%PDF").unwrap();

        let mut assets = store(&dir);
        assert!(matches!(
            assets.stage_image(&dir.path().join("doc.pdf")),
            Err(AssetError::NotAnImage(_))
        ));
    }

    #[test]
    fn test_url_percent_encoding() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("my photo.png"), b"x").unwrap();

        let mut assets = store(&dir);
        let url = assets.stage_image(&dir.path().join("my photo.png")).unwrap();
        assert!(url.contains("my%20photo-"));
    }

    #[test]
    fn test_flush_copies_staged_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"aaa").unwrap();

        let mut assets = store(&dir);
        let url = assets.stage(&dir.path().join("a.png")).unwrap();
        assert_eq!(assets.flush().unwrap(), 1);

        let name = url.rsplit('/').next().unwrap();
        assert!(dir.path().join("public/static").join(name).exists());
    }

    #[test]
    fn test_resolve() {
        let content = Path::new("/site/content");
        let file_dir = Path::new("/site/content/posts");
        assert_eq!(
            AssetStore::resolve(content, file_dir, "img/a.png"),
            PathBuf::from("/site/content/posts/img/a.png")
        );
        assert_eq!(
            AssetStore::resolve(content, file_dir, "/shared/a.png"),
            PathBuf::from("/site/content/shared/a.png")
        );
    }
}
