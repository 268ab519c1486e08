//! Content record models
//!
//! Records are produced once by the loader and never mutated afterwards.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Word count and derived reading time for a rendered body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Estimated reading time in whole minutes, rounded up
    pub reading_time: u32,
    /// Word count of the plain-text body
    pub word_count: usize,
}

impl Metadata {
    /// Derive from a word count and a reading-speed constant
    pub fn derive(word_count: usize, words_per_minute: u32) -> Self {
        let wpm = words_per_minute.max(1) as usize;
        Self {
            reading_time: word_count.div_ceil(wpm) as u32,
            word_count,
        }
    }
}

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// URL-safe identifier, unique within the posts collection
    pub slug: String,

    /// Short description for listings
    pub description: Option<String>,

    /// Publication date
    pub date: NaiveDateTime,

    /// Last updated date
    pub updated: Option<NaiveDateTime>,

    /// Public URL of the cover image, if one was referenced
    pub cover: Option<String>,

    /// Public URL of an attached video file
    pub video: Option<String>,

    /// Drafts stay out of published listings
    pub draft: bool,

    /// Whether listings should lead with this post
    pub featured: bool,

    /// Post category
    pub category: String,

    /// Post tags
    pub tags: Vec<String>,

    /// Reading time and word count
    pub metadata: Metadata,

    /// Plain-text preview of the body
    pub excerpt: String,

    /// Rendered, sanitized HTML content
    pub content: String,

    /// Source file path relative to the content root
    pub source: String,
}

/// Navigation descriptor on a page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Navigation {
    /// Label override; the page title is used when absent
    pub title: Option<String>,

    /// Sort order within the navigation bar
    pub order: i64,

    /// Hidden pages are kept out of navigation
    pub hidden: bool,
}

/// A standalone page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page title
    pub title: String,

    /// URL-safe identifier, unique within the pages collection
    pub slug: String,

    /// Short description for listings
    pub description: Option<String>,

    /// Creation date
    pub date: Option<NaiveDateTime>,

    /// Last updated date
    pub updated: Option<NaiveDateTime>,

    /// Navigation descriptor
    pub navigation: Option<Navigation>,

    /// Reading time and word count
    pub metadata: Metadata,

    /// Plain-text preview of the body
    pub excerpt: String,

    /// Rendered, sanitized HTML content
    pub content: String,

    /// Source file path relative to the content root
    pub source: String,
}

impl Page {
    /// Label shown in navigation: the override if set, else the title
    pub fn nav_title(&self) -> &str {
        self.navigation
            .as_ref()
            .and_then(|nav| nav.title.as_deref())
            .unwrap_or(&self.title)
    }

    /// Sort key within the navigation bar
    pub fn nav_order(&self) -> i64 {
        self.navigation.as_ref().map_or(0, |nav| nav.order)
    }
}

/// Social account links on an author
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    pub twitter: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    /// Personal site, absolute http(s) URL
    pub website: Option<String>,
}

/// A content author
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    pub title: String,

    /// URL-safe identifier, unique within the authors collection
    pub slug: String,

    /// Public URL of the avatar image
    pub avatar: Option<String>,

    /// Short biography
    pub bio: Option<String>,

    /// Social account links
    pub social: Option<SocialLinks>,

    /// Reading time and word count
    pub metadata: Metadata,

    /// Plain-text preview of the body
    pub excerpt: String,

    /// Rendered, sanitized HTML content
    pub content: String,

    /// Source file path relative to the content root
    pub source: String,
}
