//! HTML fragments swapped into article pages

use maud::{html, Markup};
use quill_core::{avatar_url, Comment};

/// The article's comment thread, or the empty state when there is none
pub fn comments(comments: &[Comment]) -> Markup {
    if comments.is_empty() {
        return no_comments();
    }

    html! {
        ul #comments .comments {
            @for comment in comments {
                li .comment id=(format!("comment-{}", comment.id)) {
                    img .avatar src=(avatar_url(&comment.username)) alt=(comment.username) loading="lazy";
                    div .comment-body {
                        span .comment-author { (comment.username) }
                        p .comment-content { (comment.content) }
                    }
                }
            }
        }
    }
}

pub fn no_comments() -> Markup {
    html! {
        div #comments .comments-empty {
            p { "No comments yet. Be the first to share your thoughts!" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{ArticleId, CommentId};

    fn comment(id: i64, username: &str, content: &str) -> Comment {
        Comment {
            id: CommentId(id),
            article_id: ArticleId(1),
            username: username.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_empty_thread_renders_placeholder() {
        let html = comments(&[]).into_string();

        assert!(html.contains("comments-empty"));
        assert!(html.contains("No comments yet"));
    }

    #[test]
    fn test_thread_renders_each_comment() {
        let html = comments(&[
            comment(10, "user_42", "first"),
            comment(11, "alice", "second"),
        ])
        .into_string();

        assert!(html.contains(r#"id="comment-10""#));
        assert!(html.contains(r#"id="comment-11""#));
        assert!(html.contains("https://robohash.org/42?set=set4"));
        assert!(html.contains("alice"));
    }

    #[test]
    fn test_content_is_escaped() {
        let html = comments(&[comment(1, "user_1", "<script>alert(1)</script>")]).into_string();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
