//! The produced collections and their consumer queries
//!
//! One load pass produces a `Collections` that is read-only from then on;
//! pass it by reference to whatever renders it. Queries never mutate, and
//! record order inside each collection is file discovery order.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use super::model::{Author, Page, Post};

/// All records produced by one load pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct Collections {
    pub posts: Vec<Post>,
    pub pages: Vec<Page>,
    pub authors: Vec<Author>,
}

impl Collections {
    /// Publishable posts: drafts excluded, newest first
    pub fn published_posts(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.iter().filter(|p| !p.draft).collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }

    /// The post a listing leads with: first featured published post, else
    /// the newest
    pub fn featured_post(&self) -> Option<&Post> {
        let published = self.published_posts();
        published
            .iter()
            .find(|p| p.featured)
            .copied()
            .or_else(|| published.first().copied())
    }

    /// Categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        for post in &self.posts {
            seen.insert(post.category.as_str());
        }
        seen.into_iter().collect()
    }

    /// Published posts grouped by category, groups in first-seen order
    pub fn posts_by_category(&self) -> IndexMap<&str, Vec<&Post>> {
        let mut groups: IndexMap<&str, Vec<&Post>> = IndexMap::new();
        for post in self.published_posts() {
            groups.entry(post.category.as_str()).or_default().push(post);
        }
        groups
    }

    /// Published posts carrying a tag, newest first
    pub fn posts_tagged(&self, tag: &str) -> Vec<&Post> {
        self.published_posts()
            .into_iter()
            .filter(|p| p.tags.iter().any(|t| t == tag))
            .collect()
    }

    /// Pages shown in navigation: hidden excluded, sorted by order
    ///
    /// Pages without a navigation descriptor participate with order 0. The
    /// sort is stable, so equal orders keep discovery order.
    pub fn navigation_pages(&self) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self
            .pages
            .iter()
            .filter(|p| !p.navigation.as_ref().is_some_and(|nav| nav.hidden))
            .collect();
        pages.sort_by_key(|p| p.nav_order());
        pages
    }

    /// Look up a post by slug
    pub fn post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Look up a page by slug
    pub fn page(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    /// Look up an author by slug
    pub fn author(&self, slug: &str) -> Option<&Author> {
        self.authors.iter().find(|a| a.slug == slug)
    }
}
