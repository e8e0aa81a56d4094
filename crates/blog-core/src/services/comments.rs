use std::sync::Arc;

use serde::Deserialize;
use validator::ValidateEmail;

use super::PostQueryService;
use crate::domain::{Comment, Post};
use crate::error::{DomainError, ValidationErrors};
use crate::ports::{Clock, CommentRepository};

/// Maximum length of a commenter's display name.
pub const MAX_NAME_LENGTH: usize = 80;

/// Maximum length of a commenter's email address.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length of a comment body.
pub const MAX_BODY_LENGTH: usize = 10_000;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const INVALID_EMAIL: &str = "Enter a valid email address.";

/// Raw comment fields as submitted by a reader. Any of them may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub body: Option<String>,
}

/// Comment fields that passed validation, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidComment {
    pub name: String,
    pub email: String,
    pub body: String,
}

impl CommentSubmission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            body: Some(body.into()),
        }
    }

    /// Check every field and report all failures together.
    pub fn validate(self) -> Result<ValidComment, DomainError> {
        let mut errors = ValidationErrors::new();

        let name = required(&mut errors, "name", self.name);
        let email = required(&mut errors, "email", self.email);
        let body = required(&mut errors, "body", self.body);

        if let Some(name) = &name {
            max_length(&mut errors, "name", name, MAX_NAME_LENGTH);
        }
        if let Some(email) = &email {
            if !email.validate_email() {
                errors.add("email", INVALID_EMAIL);
            }
            max_length(&mut errors, "email", email, MAX_EMAIL_LENGTH);
        }
        if let Some(body) = &body {
            max_length(&mut errors, "body", body, MAX_BODY_LENGTH);
        }

        errors.into_result()?;

        match (name, email, body) {
            (Some(name), Some(email), Some(body)) => Ok(ValidComment { name, email, body }),
            _ => Err(DomainError::Internal(
                "validated comment is missing a field".to_string(),
            )),
        }
    }
}

fn required(errors: &mut ValidationErrors, field: &str, value: Option<String>) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(v) if v.is_empty() => {
            errors.add(field, BLANK);
            None
        }
        Some(v) => Some(v),
    }
}

fn max_length(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max),
        );
    }
}

/// Accepts reader comments on published posts.
///
/// New comments are stored unpublished with a server-assigned publish date;
/// a moderator makes them visible later.
#[derive(Clone)]
pub struct CommentSubmissionService {
    query: PostQueryService,
    comments: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
}

impl CommentSubmissionService {
    pub fn new(
        query: PostQueryService,
        comments: Arc<dyn CommentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            query,
            comments,
            clock,
        }
    }

    /// Validate and store a comment against the post with `post_slug`.
    ///
    /// The post is resolved first, so a missing or unpublished post yields
    /// `NotFound` even for an invalid submission.
    pub async fn submit_comment(
        &self,
        post_slug: &str,
        submission: CommentSubmission,
    ) -> Result<Comment, DomainError> {
        let post = self.query.get_published_post(post_slug).await?;
        self.submit_to_post(&post, submission).await
    }

    /// Validate and store a comment against a post already resolved through
    /// [`PostQueryService::get_published_post`].
    pub async fn submit_to_post(
        &self,
        post: &Post,
        submission: CommentSubmission,
    ) -> Result<Comment, DomainError> {
        let fields = submission.validate()?;

        let comment = Comment::new(post.id, fields.name, fields.email, fields.body, self.clock.now());
        let saved = self.comments.save(comment).await?;

        tracing::info!(
            post = %post.slug,
            comment_id = %saved.id,
            "Comment received, pending moderation"
        );

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_of(submission: CommentSubmission) -> ValidationErrors {
        match submission.validate() {
            Err(DomainError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_submission_is_trimmed() {
        let valid = CommentSubmission::new("  Ann ", "ann@example.com", " Nice post ")
            .validate()
            .unwrap();
        assert_eq!(valid.name, "Ann");
        assert_eq!(valid.body, "Nice post");
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let errors = errors_of(CommentSubmission::new("Ann", "test", "Hello"));
        assert_eq!(errors.get("email"), Some(&[INVALID_EMAIL.to_string()][..]));
        assert!(!errors.has("name"));
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        for field in ["name", "email", "body"] {
            let mut submission = CommentSubmission::new("Ann", "ann@example.com", "Hello");
            match field {
                "name" => submission.name = None,
                "email" => submission.email = None,
                _ => submission.body = None,
            }
            let errors = errors_of(submission);
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec![field]);
            assert_eq!(errors.get(field), Some(&[REQUIRED.to_string()][..]));
        }
    }

    #[test]
    fn test_all_failures_are_collected() {
        let errors = errors_of(CommentSubmission {
            name: Some("   ".into()),
            email: Some("not-an-email".into()),
            body: None,
        });
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["body", "email", "name"]);
        assert_eq!(errors.get("name"), Some(&[BLANK.to_string()][..]));
    }

    #[test]
    fn test_overlong_body_is_rejected() {
        let errors = errors_of(CommentSubmission::new(
            "Ann",
            "ann@example.com",
            "x".repeat(MAX_BODY_LENGTH + 1),
        ));
        assert!(errors.has("body"));
    }

    #[test]
    fn test_overlong_name_is_rejected() {
        assert!(CommentSubmission::new("x".repeat(MAX_NAME_LENGTH), "ann@example.com", "Hi")
            .validate()
            .is_ok());

        let errors = errors_of(CommentSubmission::new(
            "x".repeat(MAX_NAME_LENGTH + 1),
            "ann@example.com",
            "Hi",
        ));
        assert_eq!(
            errors.get("name"),
            Some(&["Ensure this field has no more than 80 characters.".to_string()][..])
        );
    }

    #[test]
    fn test_email_longer_than_column_is_rejected() {
        let label = "d".repeat(60);
        let email = format!("{}@{}.{}.{}.{}.com", "a".repeat(64), label, label, label, label);
        assert!(email.len() > MAX_EMAIL_LENGTH);

        let errors = errors_of(CommentSubmission::new("Ann", email, "Hi"));
        assert!(
            errors
                .get("email")
                .unwrap()
                .contains(&"Ensure this field has no more than 254 characters.".to_string())
        );
        assert!(!errors.has("name"));
    }
}
