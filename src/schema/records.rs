//! Raw front-matter shapes and their validation
//!
//! Each collection gets an all-optional serde struct so that a missing
//! required field surfaces as a named violation instead of a single
//! deserialization error, and `validate` can report the complete list.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

use super::fields;
use crate::content::{Navigation, SocialLinks};
use crate::report::Violation;

/// Maximum title length, all collections
pub const MAX_TITLE_LEN: usize = 99;
/// Maximum description length
pub const MAX_DESCRIPTION_LEN: usize = 199;
/// Maximum author bio length
pub const MAX_BIO_LEN: usize = 500;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Raw post front-matter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostMatter {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub updated: Option<String>,
    pub cover: Option<String>,
    pub video: Option<String>,
    pub draft: bool,
    pub featured: bool,
    pub category: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
}

/// Post front-matter with every constraint checked
#[derive(Debug, Clone)]
pub struct ValidPost {
    pub title: String,
    /// Explicit slug override, if the author set one
    pub slug: Option<String>,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub updated: Option<NaiveDateTime>,
    pub cover: Option<String>,
    pub video: Option<String>,
    pub draft: bool,
    pub featured: bool,
    pub category: String,
    pub tags: Vec<String>,
}

impl PostMatter {
    /// Validate against the posts schema, reporting every violation
    pub fn validate(&self) -> Result<ValidPost, Vec<Violation>> {
        let mut issues = Vec::new();

        let title = match fields::required("title", self.title.as_deref(), &mut issues) {
            Some(t) if fields::max_len("title", t, MAX_TITLE_LEN, &mut issues) => {
                Some(t.to_string())
            }
            _ => None,
        };

        if let Some(slug) = &self.slug {
            fields::slug_format("slug", slug, &mut issues);
        }
        if let Some(description) = &self.description {
            fields::max_len("description", description, MAX_DESCRIPTION_LEN, &mut issues);
        }

        let date = match self.date.as_deref() {
            Some(_) => fields::isodate("date", self.date.as_deref(), &mut issues),
            None => {
                issues.push(Violation::new("date", "missing required field"));
                None
            }
        };
        let updated = fields::isodate("updated", self.updated.as_deref(), &mut issues);

        let category = fields::required("category", self.category.as_deref(), &mut issues)
            .map(str::to_string);

        match (title, date, category) {
            (Some(title), Some(date), Some(category)) if issues.is_empty() => Ok(ValidPost {
                title,
                slug: self.slug.clone(),
                description: self.description.clone(),
                date,
                updated,
                cover: self.cover.clone(),
                video: self.video.clone(),
                draft: self.draft,
                featured: self.featured,
                category,
                tags: self.tags.clone(),
            }),
            _ => Err(issues),
        }
    }
}

/// Raw navigation descriptor on a page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NavigationMatter {
    pub title: Option<String>,
    pub order: i64,
    pub hidden: bool,
}

/// Raw page front-matter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageMatter {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub updated: Option<String>,
    pub navigation: Option<NavigationMatter>,
}

/// Page front-matter with every constraint checked
#[derive(Debug, Clone)]
pub struct ValidPage {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub updated: Option<NaiveDateTime>,
    pub navigation: Option<Navigation>,
}

impl PageMatter {
    /// Validate against the pages schema, reporting every violation
    pub fn validate(&self) -> Result<ValidPage, Vec<Violation>> {
        let mut issues = Vec::new();

        let title = match fields::required("title", self.title.as_deref(), &mut issues) {
            Some(t) if fields::max_len("title", t, MAX_TITLE_LEN, &mut issues) => {
                Some(t.to_string())
            }
            _ => None,
        };

        if let Some(slug) = &self.slug {
            fields::slug_format("slug", slug, &mut issues);
        }
        if let Some(description) = &self.description {
            fields::max_len("description", description, MAX_DESCRIPTION_LEN, &mut issues);
        }

        let date = fields::isodate("date", self.date.as_deref(), &mut issues);
        let updated = fields::isodate("updated", self.updated.as_deref(), &mut issues);

        let navigation = self.navigation.as_ref().map(|nav| Navigation {
            title: nav.title.clone(),
            order: nav.order,
            hidden: nav.hidden,
        });

        match title {
            Some(title) if issues.is_empty() => Ok(ValidPage {
                title,
                slug: self.slug.clone(),
                description: self.description.clone(),
                date,
                updated,
                navigation,
            }),
            _ => Err(issues),
        }
    }
}

/// Raw social links on an author
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocialMatter {
    pub twitter: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
}

/// Raw author front-matter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthorMatter {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub social: Option<SocialMatter>,
}

/// Author front-matter with every constraint checked
#[derive(Debug, Clone)]
pub struct ValidAuthor {
    pub title: String,
    pub slug: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub social: Option<SocialLinks>,
}

impl AuthorMatter {
    /// Validate against the authors schema, reporting every violation
    pub fn validate(&self) -> Result<ValidAuthor, Vec<Violation>> {
        let mut issues = Vec::new();

        let title = match fields::required("title", self.title.as_deref(), &mut issues) {
            Some(t) if fields::max_len("title", t, MAX_TITLE_LEN, &mut issues) => {
                Some(t.to_string())
            }
            _ => None,
        };

        if let Some(slug) = &self.slug {
            fields::slug_format("slug", slug, &mut issues);
        }
        if let Some(bio) = &self.bio {
            fields::max_len("bio", bio, MAX_BIO_LEN, &mut issues);
        }

        let social = self.social.as_ref().map(|social| {
            if let Some(twitter) = &social.twitter {
                fields::handle("social.twitter", twitter, &mut issues);
            }
            if let Some(github) = &social.github {
                fields::handle("social.github", github, &mut issues);
            }
            if let Some(linkedin) = &social.linkedin {
                fields::handle("social.linkedin", linkedin, &mut issues);
            }
            if let Some(website) = &social.website {
                fields::url("social.website", website, &mut issues);
            }
            SocialLinks {
                twitter: social.twitter.clone(),
                github: social.github.clone(),
                linkedin: social.linkedin.clone(),
                website: social.website.clone(),
            }
        });

        match title {
            Some(title) if issues.is_empty() => Ok(ValidAuthor {
                title,
                slug: self.slug.clone(),
                avatar: self.avatar.clone(),
                bio: self.bio.clone(),
                social,
            }),
            _ => Err(issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_post() {
        let matter = PostMatter {
            title: Some("Hello World".to_string()),
            date: Some("2024-01-15".to_string()),
            category: Some("engineering".to_string()),
            tags: vec!["rust".to_string()],
            ..Default::default()
        };

        let valid = matter.validate().unwrap();
        assert_eq!(valid.title, "Hello World");
        assert_eq!(valid.category, "engineering");
        assert!(!valid.draft);
        assert!(!valid.featured);
    }

    #[test]
    fn test_title_boundary() {
        let mut matter = PostMatter {
            title: Some("a".repeat(99)),
            date: Some("2024-01-15".to_string()),
            category: Some("notes".to_string()),
            ..Default::default()
        };
        assert!(matter.validate().is_ok());

        matter.title = Some("a".repeat(100));
        let issues = matter.validate().unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "title");
    }

    #[test]
    fn test_missing_category_named() {
        let matter = PostMatter {
            title: Some("Untagged".to_string()),
            date: Some("2024-01-15".to_string()),
            tags: Vec::new(),
            ..Default::default()
        };

        let issues = matter.validate().unwrap_err();
        assert!(issues.iter().any(|v| v.field == "category"));
    }

    #[test]
    fn test_all_violations_reported() {
        let matter = PostMatter {
            title: Some("a".repeat(100)),
            description: Some("d".repeat(200)),
            date: Some("whenever".to_string()),
            slug: Some("Not A Slug".to_string()),
            ..Default::default()
        };

        let issues = matter.validate().unwrap_err();
        let fields: Vec<&str> = issues.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"description"));
        assert!(fields.contains(&"date"));
        assert!(fields.contains(&"slug"));
        assert!(fields.contains(&"category"));
    }

    #[test]
    fn test_tags_single_string() {
        let yaml = "title: T\ndate: 2024-01-15\ncategory: c\ntags: rust\n";
        let matter: PostMatter = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(matter.tags, vec!["rust"]);
    }

    #[test]
    fn test_page_navigation_defaults() {
        let yaml = "title: About\nnavigation:\n  hidden: true\n";
        let matter: PageMatter = serde_yaml::from_str(yaml).unwrap();
        let valid = matter.validate().unwrap();
        let nav = valid.navigation.unwrap();
        assert_eq!(nav.order, 0);
        assert!(nav.hidden);
        assert!(nav.title.is_none());
    }

    #[test]
    fn test_author_social_validation() {
        let matter = AuthorMatter {
            title: Some("Jane Doe".to_string()),
            bio: Some("b".repeat(501)),
            social: Some(SocialMatter {
                twitter: Some("@jane".to_string()),
                website: Some("example.com".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let issues = matter.validate().unwrap_err();
        let fields: Vec<&str> = issues.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"bio"));
        assert!(fields.contains(&"social.website"));
        assert!(!fields.contains(&"social.twitter"));
    }
}
