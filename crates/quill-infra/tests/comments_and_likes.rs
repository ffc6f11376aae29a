mod common;

use quill_core::DomainError;
use quill_core::query::{
    CommentSortField, Direction, LikeSortField, PageRequest, PostKeyword, PostKeywordType, Sort,
};
use uuid::Uuid;

use common::backends;

#[tokio::test]
async fn comments_are_listed_per_post_in_pages() {
    for s in backends().await {
        let author = s.user("alice").await;
        let post = s.post(author, "discussed", "c").await;
        let other = s.post(author, "quiet", "c").await;

        for i in 0..3 {
            s.comments
                .create_comment(post, &format!("comment {i}"))
                .await
                .unwrap();
        }
        s.comments.create_comment(other, "elsewhere").await.unwrap();

        let sort = Sort::by(CommentSortField::Created, Direction::Asc);
        let first = s
            .comments
            .get_all_by_post_id(post, &PageRequest::new(0, 2, sort.clone()).unwrap())
            .await
            .unwrap();
        let second = s
            .comments
            .get_all_by_post_id(post, &PageRequest::new(1, 2, sort).unwrap())
            .await
            .unwrap();

        assert_eq!(first.total_elements, 3, "{}", s.backend);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.content.len(), 2);
        assert_eq!(second.content.len(), 1);
        assert!(
            first
                .content
                .iter()
                .chain(&second.content)
                .all(|c| c.post_id == post)
        );
    }
}

#[tokio::test]
async fn comments_need_content_and_an_active_post() {
    for s in backends().await {
        let author = s.user("alice").await;
        let post = s.post(author, "p", "c").await;

        assert!(matches!(
            s.comments.create_comment(post, "   ").await,
            Err(DomainError::InvalidArgument(_))
        ));

        s.posts.soft_delete_my_post(post, author).await.unwrap();
        assert!(matches!(
            s.comments.create_comment(post, "late").await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            s.comments.create_comment(Uuid::new_v4(), "lost").await,
            Err(DomainError::NotFound { .. })
        ));
    }
}

#[tokio::test]
async fn a_post_can_be_liked_once_per_user() {
    for s in backends().await {
        let alice = s.user("alice").await;
        let bob = s.user("bob").await;
        let post = s.post(alice, "likeable", "c").await;

        s.likes.like_post(alice, post).await.unwrap();
        s.likes.like_post(bob, post).await.unwrap();
        assert!(matches!(
            s.likes.like_post(bob, post).await,
            Err(DomainError::Duplicate(_))
        ));
        assert_eq!(s.likes.count_likes(post).await.unwrap(), 2, "{}", s.backend);

        s.likes.unlike_post(bob, post).await.unwrap();
        assert_eq!(s.likes.count_likes(post).await.unwrap(), 1);
        assert!(matches!(
            s.likes.unlike_post(bob, post).await,
            Err(DomainError::NotFound { entity_type: "Like", .. })
        ));
    }
}

#[tokio::test]
async fn liking_as_an_unknown_user_is_not_found() {
    for s in backends().await {
        let alice = s.user("alice").await;
        let post = s.post(alice, "likeable", "c").await;

        let stranger = Uuid::new_v4();
        assert!(
            matches!(
                s.likes.like_post(stranger, post).await,
                Err(DomainError::NotFound { entity_type: "User", id }) if id == stranger
            ),
            "{}",
            s.backend
        );
        assert_eq!(s.likes.count_likes(post).await.unwrap(), 0);

        s.users.purge_all().await.unwrap();
        assert!(matches!(
            s.likes.like_post(alice, post).await,
            Err(DomainError::NotFound { entity_type: "User", .. })
        ));
    }
}

#[tokio::test]
async fn liked_posts_skip_deleted_and_honour_the_keyword() {
    for s in backends().await {
        let alice = s.user("alice").await;
        let bob = s.user("bob").await;
        let rust = s.post(alice, "rust tips", "c").await;
        let go = s.post(alice, "go tips", "c").await;
        let removed = s.post(alice, "rust news", "c").await;

        for post in [rust, go, removed] {
            s.likes.like_post(bob, post).await.unwrap();
        }
        s.posts.soft_delete_my_post(removed, alice).await.unwrap();

        let sort = Sort::<LikeSortField>::default();
        let liked = s
            .likes
            .find_liked_posts(bob, &sort, &PostKeyword::any())
            .await
            .unwrap();
        let mut ids: Vec<Uuid> = liked.iter().map(|l| l.post.id).collect();
        ids.sort();
        let mut expected = vec![rust, go];
        expected.sort();
        assert_eq!(ids, expected, "{}", s.backend);

        let keyword = PostKeyword::new(PostKeywordType::Title, "rust");
        let liked = s.likes.find_liked_posts(bob, &sort, &keyword).await.unwrap();
        assert_eq!(liked.len(), 1, "{}", s.backend);
        assert_eq!(liked[0].post.title, "rust tips");
        assert_eq!(liked[0].post.author_name.as_deref(), Some("alice"));
    }
}

#[tokio::test]
async fn liking_a_deleted_post_is_not_found() {
    for s in backends().await {
        let alice = s.user("alice").await;
        let post = s.post(alice, "p", "c").await;
        s.posts.soft_delete_my_post(post, alice).await.unwrap();

        assert!(matches!(
            s.likes.like_post(alice, post).await,
            Err(DomainError::NotFound { entity_type: "Post", .. })
        ));
    }
}
