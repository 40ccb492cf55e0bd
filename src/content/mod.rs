//! Content module - front-matter parsing, the post model, and
//! collection loading

mod frontmatter;
mod loader;
pub mod markdown;
mod post;

pub use frontmatter::{FrontMatter, MetadataError};
pub use loader::{ContentLoader, DocumentError, LoadFailure, LoadReport};
pub use post::Post;
