//! Application services - the public read path, comment intake and the
//! store-level helpers moderators rely on.

mod comments;
mod moderation;
mod posts;

pub use comments::{CommentSubmission, CommentSubmissionService, ValidComment};
pub use moderation::{ModerationService, TagUsage};
pub use posts::PostQueryService;
