use uuid::Uuid;

use super::types::{Post, Visibility};

/// Private posts are visible only to their authors
pub fn can_view_post(current_user_id: &Uuid, post: &Post) -> bool {
    match post.visibility {
        Visibility::Public => true,
        Visibility::Private => &post.author_id == current_user_id,
    }
}

#[cfg(all(test, feature = "test-utils"))]
mod tests {
    use super::*;

    #[test]
    fn test_can_view_post_public() {
        let post = Post {
            visibility: Visibility::Public,
            ..Default::default()
        };
        assert!(can_view_post(&Uuid::new_v4(), &post));
    }

    #[test]
    fn test_can_view_post_private() {
        let post = Post {
            visibility: Visibility::Private,
            ..Default::default()
        };
        assert!(!can_view_post(&Uuid::new_v4(), &post));
        assert!(can_view_post(&post.author_id, &post));
    }
}
