//! Slug derivation and per-collection uniqueness

use std::collections::HashSet;

use crate::report::Violation;

/// Disambiguation attempts before a collision becomes a build error
const MAX_ATTEMPTS: u32 = 99;

/// Normalize a title to its URL-safe form
pub fn slugify(title: &str) -> String {
    slug::slugify(title)
}

/// Tracks claimed slugs within one collection
///
/// The first claimant keeps the bare base; later collisions get `-2`, `-3`,
/// and so on, deterministically in claim order.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    taken: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a unique slug derived from `base`
    pub fn claim(&mut self, base: &str) -> Result<String, Violation> {
        if base.is_empty() {
            return Err(Violation::new(
                "slug",
                "title normalizes to an empty slug; set `slug` explicitly",
            ));
        }

        if self.taken.insert(base.to_string()) {
            return Ok(base.to_string());
        }

        for n in 2..=(MAX_ATTEMPTS + 1) {
            let candidate = format!("{}-{}", base, n);
            if self.taken.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }

        Err(Violation::new(
            "slug",
            format!(
                "`{}` is duplicated and disambiguation gave up after {} attempts",
                base, MAX_ATTEMPTS
            ),
        ))
    }
}
