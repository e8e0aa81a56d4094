use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity - a label attached to posts through the `post_tags` relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
}

impl Tag {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            slug: slug.into(),
        }
    }
}
