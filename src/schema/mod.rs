//! Collection schemas
//!
//! Declares, per collection, the raw front-matter shape and the constraints
//! each field must satisfy. Validation reports every violated constraint,
//! not just the first.

pub mod fields;
mod records;

pub use records::{AuthorMatter, PageMatter, PostMatter};
pub use records::{ValidAuthor, ValidPage, ValidPost};
pub use records::{MAX_BIO_LEN, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
