//! Content loader - compiles the collections from the content root
//!
//! One pass per build: enumerate the files each collection's pattern
//! matches, parse and validate every one, derive slugs, excerpts, metadata
//! and rendered HTML, and either hand back the finished collections or fail
//! with a report listing every violation found.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::collections::Collections;
use super::frontmatter;
use super::markdown::{self, MarkdownRenderer};
use super::model::{Author, Metadata, Page, Post};
use super::slug::{slugify, SlugRegistry};
use crate::assets::AssetStore;
use crate::report::{BuildReport, Violation};
use crate::schema::{AuthorMatter, PageMatter, PostMatter};
use crate::Vellum;

/// Loads content from the content root
pub struct ContentLoader<'a> {
    vellum: &'a Vellum,
    renderer: MarkdownRenderer,
}

/// Per-file outcome: a finished record, or everything wrong with the file
type FileResult<T> = std::result::Result<T, Vec<Violation>>;

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(vellum: &'a Vellum) -> Self {
        let highlight = &vellum.config.highlight;
        let renderer = MarkdownRenderer::with_options(&highlight.theme, highlight.enable);
        Self { vellum, renderer }
    }

    /// Load and validate every collection, or fail with the full report
    pub fn load(&self, assets: &mut AssetStore) -> Result<Collections> {
        let mut report = BuildReport::default();

        let posts = self.load_posts(assets, &mut report)?;
        let pages = self.load_pages(assets, &mut report)?;
        let authors = self.load_authors(assets, &mut report)?;

        if !report.is_empty() {
            return Err(report.into());
        }

        Ok(Collections {
            posts,
            pages,
            authors,
        })
    }

    /// Load all posts matching the posts pattern
    fn load_posts(&self, assets: &mut AssetStore, report: &mut BuildReport) -> Result<Vec<Post>> {
        let mut registry = SlugRegistry::new();
        let mut posts = Vec::new();

        for path in self.discover(&self.vellum.config.collections.posts)? {
            let source = self.relative(&path);
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            match self.load_post(&path, &source, &raw, assets, &mut registry) {
                Ok(post) => posts.push(post),
                Err(violations) => report.push(source, violations),
            }
        }

        tracing::debug!("loaded {} posts", posts.len());
        Ok(posts)
    }

    fn load_post(
        &self,
        path: &Path,
        source: &str,
        raw: &str,
        assets: &mut AssetStore,
        registry: &mut SlugRegistry,
    ) -> FileResult<Post> {
        let (matter, body) = match frontmatter::parse::<PostMatter>(raw) {
            Ok(parsed) => parsed,
            Err(e) => return Err(vec![Violation::new("front-matter", e.to_string())]),
        };
        let valid = matter.validate()?;

        let mut violations = Vec::new();
        let slug = self.claim_slug(valid.slug.as_deref(), &valid.title, registry, &mut violations);

        let file_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let cover = self.asset_field(
            "cover",
            valid.cover.as_deref(),
            file_dir,
            assets,
            true,
            &mut violations,
        );
        let video = self.asset_field(
            "video",
            valid.video.as_deref(),
            file_dir,
            assets,
            false,
            &mut violations,
        );

        let content = self.render(body, file_dir, assets, &mut violations);
        let (metadata, excerpt) = self.derive_text(body);

        match (slug, content) {
            (Some(slug), Some(content)) if violations.is_empty() => Ok(Post {
                title: valid.title,
                slug,
                description: valid.description,
                date: valid.date,
                updated: valid.updated,
                cover,
                video,
                draft: valid.draft,
                featured: valid.featured,
                category: valid.category,
                tags: valid.tags,
                metadata,
                excerpt,
                content,
                source: source.to_string(),
            }),
            _ => Err(violations),
        }
    }

    /// Load all pages matching the pages pattern
    fn load_pages(&self, assets: &mut AssetStore, report: &mut BuildReport) -> Result<Vec<Page>> {
        let mut registry = SlugRegistry::new();
        let mut pages = Vec::new();

        for path in self.discover(&self.vellum.config.collections.pages)? {
            let source = self.relative(&path);
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            match self.load_page(&path, &source, &raw, assets, &mut registry) {
                Ok(page) => pages.push(page),
                Err(violations) => report.push(source, violations),
            }
        }

        tracing::debug!("loaded {} pages", pages.len());
        Ok(pages)
    }

    fn load_page(
        &self,
        path: &Path,
        source: &str,
        raw: &str,
        assets: &mut AssetStore,
        registry: &mut SlugRegistry,
    ) -> FileResult<Page> {
        let (matter, body) = match frontmatter::parse::<PageMatter>(raw) {
            Ok(parsed) => parsed,
            Err(e) => return Err(vec![Violation::new("front-matter", e.to_string())]),
        };
        let valid = matter.validate()?;

        let mut violations = Vec::new();
        let slug = self.claim_slug(valid.slug.as_deref(), &valid.title, registry, &mut violations);

        let file_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let content = self.render(body, file_dir, assets, &mut violations);
        let (metadata, excerpt) = self.derive_text(body);

        match (slug, content) {
            (Some(slug), Some(content)) if violations.is_empty() => Ok(Page {
                title: valid.title,
                slug,
                description: valid.description,
                date: valid.date,
                updated: valid.updated,
                navigation: valid.navigation,
                metadata,
                excerpt,
                content,
                source: source.to_string(),
            }),
            _ => Err(violations),
        }
    }

    /// Load all authors matching the authors pattern
    fn load_authors(
        &self,
        assets: &mut AssetStore,
        report: &mut BuildReport,
    ) -> Result<Vec<Author>> {
        let mut registry = SlugRegistry::new();
        let mut authors = Vec::new();

        for path in self.discover(&self.vellum.config.collections.authors)? {
            let source = self.relative(&path);
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            match self.load_author(&path, &source, &raw, assets, &mut registry) {
                Ok(author) => authors.push(author),
                Err(violations) => report.push(source, violations),
            }
        }

        tracing::debug!("loaded {} authors", authors.len());
        Ok(authors)
    }

    fn load_author(
        &self,
        path: &Path,
        source: &str,
        raw: &str,
        assets: &mut AssetStore,
        registry: &mut SlugRegistry,
    ) -> FileResult<Author> {
        let (matter, body) = match frontmatter::parse::<AuthorMatter>(raw) {
            Ok(parsed) => parsed,
            Err(e) => return Err(vec![Violation::new("front-matter", e.to_string())]),
        };
        let valid = matter.validate()?;

        let mut violations = Vec::new();
        let slug = self.claim_slug(valid.slug.as_deref(), &valid.title, registry, &mut violations);

        let file_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let avatar = self.asset_field(
            "avatar",
            valid.avatar.as_deref(),
            file_dir,
            assets,
            true,
            &mut violations,
        );

        let content = self.render(body, file_dir, assets, &mut violations);
        let (metadata, excerpt) = self.derive_text(body);

        match (slug, content) {
            (Some(slug), Some(content)) if violations.is_empty() => Ok(Author {
                title: valid.title,
                slug,
                avatar,
                bio: valid.bio,
                social: valid.social,
                metadata,
                excerpt,
                content,
                source: source.to_string(),
            }),
            _ => Err(violations),
        }
    }

    /// Files under the content root matching a collection pattern, sorted
    fn discover(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let root = &self.vellum.content_dir;
        if !root.exists() {
            return Ok(Vec::new());
        }

        let full = glob::Pattern::new(pattern)
            .with_context(|| format!("invalid collection pattern `{}`", pattern))?;
        // glob's `**` wants at least one path component; also accept direct
        // children so `posts/**/*.md` matches `posts/hello.md`
        let direct = glob::Pattern::new(&pattern.replace("/**/", "/"))
            .with_context(|| format!("invalid collection pattern `{}`", pattern))?;

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(path);
            if full.matches_path(relative) || direct.matches_path(relative) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Claim a unique slug: the explicit override if set, else the title
    fn claim_slug(
        &self,
        explicit: Option<&str>,
        title: &str,
        registry: &mut SlugRegistry,
        violations: &mut Vec<Violation>,
    ) -> Option<String> {
        let base = match explicit {
            Some(slug) => slug.to_string(),
            None => slugify(title),
        };
        match registry.claim(&base) {
            Ok(slug) => Some(slug),
            Err(violation) => {
                violations.push(violation);
                None
            }
        }
    }

    /// Resolve and stage a front-matter asset reference
    fn asset_field(
        &self,
        field: &str,
        reference: Option<&str>,
        file_dir: &Path,
        assets: &mut AssetStore,
        image: bool,
        violations: &mut Vec<Violation>,
    ) -> Option<String> {
        let reference = reference?;
        let resolved = AssetStore::resolve(&self.vellum.content_dir, file_dir, reference);
        let staged = if image {
            assets.stage_image(&resolved)
        } else {
            assets.stage(&resolved)
        };
        match staged {
            Ok(url) => Some(url),
            Err(e) => {
                violations.push(Violation::new(field, e.to_string()));
                None
            }
        }
    }

    /// Render the body, rewriting relative image references through the store
    fn render(
        &self,
        body: &str,
        file_dir: &Path,
        assets: &mut AssetStore,
        violations: &mut Vec<Violation>,
    ) -> Option<String> {
        let result = self.renderer.render_with(body, |reference| {
            if is_external(reference) {
                return Ok(reference.to_string());
            }
            let resolved = AssetStore::resolve(&self.vellum.content_dir, file_dir, reference);
            Ok(assets.stage(&resolved)?)
        });
        match result {
            Ok(html) => Some(html),
            Err(e) => {
                violations.push(Violation::new("content", e.to_string()));
                None
            }
        }
    }

    /// Metadata and excerpt, both derived from the plain-text body
    fn derive_text(&self, body: &str) -> (Metadata, String) {
        let text = markdown::plain_text(body);
        let word_count = text.split_whitespace().count();
        let metadata = Metadata::derive(word_count, self.vellum.config.words_per_minute);
        let excerpt = markdown::excerpt(&text, self.vellum.config.excerpt_length);
        (metadata, excerpt)
    }

    /// Source path relative to the content root
    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.vellum.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }
}

/// References the asset store never touches
fn is_external(reference: &str) -> bool {
    reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("//")
        || reference.starts_with("data:")
        || reference.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::BuildReport;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, path: &str, content: &str) {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn vellum(dir: &TempDir) -> Vellum {
        Vellum::new(dir.path()).unwrap()
    }

    fn load(dir: &TempDir) -> Result<Collections> {
        let vellum = vellum(dir);
        let mut assets = AssetStore::new(vellum.assets_dir.clone(), &vellum.config.output.base);
        ContentLoader::new(&vellum).load(&mut assets)
    }

    const POST: &str = "---\ntitle: Hello World\ndate: 2024-01-15\ncategory: engineering\ntags:\n  - rust\n---\n\nA short body with exactly a handful of words.\n";

    #[test]
    fn test_load_valid_post() {
        let dir = TempDir::new().unwrap();
        write(&dir, "content/posts/hello.md", POST);

        let collections = load(&dir).unwrap();
        assert_eq!(collections.posts.len(), 1);

        let post = &collections.posts[0];
        assert_eq!(post.title, "Hello World");
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.category, "engineering");
        assert_eq!(post.tags, vec!["rust"]);
        assert_eq!(post.source, "posts/hello.md");
        assert!(post.content.contains("<p>"));
        assert_eq!(post.excerpt, "A short body with exactly a handful of words.");
        assert_eq!(post.metadata.word_count, 9);
        assert_eq!(post.metadata.reading_time, 1);
        assert!(!post.draft);
    }

    #[test]
    fn test_nested_and_direct_children_discovered() {
        let dir = TempDir::new().unwrap();
        write(&dir, "content/posts/direct.md", POST);
        write(
            &dir,
            "content/posts/2024/nested.md",
            "---\ntitle: Nested\ndate: 2024-02-01\ncategory: notes\n---\nBody.\n",
        );

        let collections = load(&dir).unwrap();
        assert_eq!(collections.posts.len(), 2);
    }

    #[test]
    fn test_drafts_are_loaded_but_unpublished() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "content/posts/draft.md",
            "---\ntitle: WIP\ndate: 2024-03-01\ncategory: notes\ndraft: true\n---\nBody.\n",
        );

        let collections = load(&dir).unwrap();
        assert_eq!(collections.posts.len(), 1);
        assert!(collections.published_posts().is_empty());
    }

    #[test]
    fn test_duplicate_titles_get_unique_slugs() {
        let dir = TempDir::new().unwrap();
        let same = "---\ntitle: Same Title\ndate: 2024-01-01\ncategory: c\n---\nBody.\n";
        write(&dir, "content/posts/a.md", same);
        write(&dir, "content/posts/b.md", same);
        write(&dir, "content/posts/c.md", same);

        let collections = load(&dir).unwrap();
        let mut slugs: Vec<&str> = collections.posts.iter().map(|p| p.slug.as_str()).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["same-title", "same-title-2", "same-title-3"]);
    }

    #[test]
    fn test_explicit_slug_override() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "content/posts/a.md",
            "---\ntitle: Long Marketing Title\nslug: launch\ndate: 2024-01-01\ncategory: c\n---\nBody.\n",
        );

        let collections = load(&dir).unwrap();
        assert_eq!(collections.posts[0].slug, "launch");
    }

    #[test]
    fn test_all_violations_reported_across_files() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "content/posts/no-category.md",
            "---\ntitle: Missing Things\ndate: 2024-01-01\ntags: []\n---\nBody.\n",
        );
        write(
            &dir,
            "content/posts/long-title.md",
            &format!("---\ntitle: {}\ndate: 2024-01-01\ncategory: c\n---\nBody.\n", "a".repeat(100)),
        );
        write(&dir, "content/posts/good.md", POST);

        let err = load(&dir).unwrap_err();
        let report = err.downcast_ref::<BuildReport>().unwrap();
        assert_eq!(report.files.len(), 2);

        let text = report.to_string();
        assert!(text.contains("posts/no-category.md"));
        assert!(text.contains("field `category`"));
        assert!(text.contains("posts/long-title.md"));
        assert!(text.contains("field `title`"));
    }

    #[test]
    fn test_missing_cover_is_a_violation() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "content/posts/a.md",
            "---\ntitle: T\ndate: 2024-01-01\ncategory: c\ncover: nope.png\n---\nBody.\n",
        );

        let err = load(&dir).unwrap_err();
        let report = err.downcast_ref::<BuildReport>().unwrap();
        assert!(report.to_string().contains("field `cover`"));
    }

    #[test]
    fn test_body_image_rewritten_and_staged() {
        let dir = TempDir::new().unwrap();
        write(&dir, "content/posts/img/flow.png", "png bytes");
        write(
            &dir,
            "content/posts/a.md",
            "---\ntitle: T\ndate: 2024-01-01\ncategory: c\n---\n![flow](img/flow.png)\n",
        );

        let vellum = vellum(&dir);
        let mut assets = AssetStore::new(vellum.assets_dir.clone(), &vellum.config.output.base);
        let collections = ContentLoader::new(&vellum).load(&mut assets).unwrap();

        assert!(collections.posts[0].content.contains("src=\"/static/flow-"));
        assert_eq!(assets.len(), 1);
    }

    #[test]
    fn test_missing_body_image_is_a_violation() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "content/posts/a.md",
            "---\ntitle: T\ndate: 2024-01-01\ncategory: c\n---\n![flow](img/missing.png)\n",
        );

        let err = load(&dir).unwrap_err();
        let report = err.downcast_ref::<BuildReport>().unwrap();
        assert!(report.to_string().contains("field `content`"));
        assert!(report.to_string().contains("does not exist"));
    }

    #[test]
    fn test_external_image_untouched() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "content/posts/a.md",
            "---\ntitle: T\ndate: 2024-01-01\ncategory: c\n---\n![x](https://example.com/x.png)\n",
        );

        let collections = load(&dir).unwrap();
        assert!(collections.posts[0]
            .content
            .contains("https://example.com/x.png"));
    }

    #[test]
    fn test_pages_and_authors_loaded() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "content/pages/about.md",
            "---\ntitle: About Us\nnavigation:\n  title: About\n  order: 2\n---\nWho we are.\n",
        );
        write(
            &dir,
            "content/authors/jane.md",
            "---\ntitle: Jane Doe\nbio: Writes about reliability.\nsocial:\n  github: janedoe\n  website: https://jane.example\n---\nJane's longer story.\n",
        );

        let collections = load(&dir).unwrap();
        assert_eq!(collections.pages.len(), 1);
        assert_eq!(collections.authors.len(), 1);

        let page = &collections.pages[0];
        assert_eq!(page.slug, "about-us");
        assert_eq!(page.nav_title(), "About");

        let author = &collections.authors[0];
        assert_eq!(author.slug, "jane-doe");
        let social = author.social.as_ref().unwrap();
        assert_eq!(social.github.as_deref(), Some("janedoe"));
    }

    #[test]
    fn test_unterminated_frontmatter_reported() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "content/posts/broken.md",
            "---\ntitle: Broken\ndate: 2024-01-01\n\nNever closed.\n",
        );

        let err = load(&dir).unwrap_err();
        let report = err.downcast_ref::<BuildReport>().unwrap();
        assert!(report.to_string().contains("front-matter"));
        assert!(report.to_string().contains("posts/broken.md"));
    }

    #[test]
    fn test_missing_content_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let collections = load(&dir).unwrap();
        assert!(collections.posts.is_empty());
        assert!(collections.pages.is_empty());
        assert!(collections.authors.is_empty());
    }
}
