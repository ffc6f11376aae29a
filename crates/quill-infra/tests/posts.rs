mod common;

use quill_core::DomainError;
use quill_core::services::PostService;
use quill_core::query::{
    Direction, PageRequest, PostKeyword, PostKeywordType, PostSortField, Sort,
};
use uuid::Uuid;

use common::backends;

fn all() -> PageRequest<PostSortField> {
    PageRequest::of(0, 100).unwrap()
}

async fn hits(posts: &PostService, kind: PostKeywordType, value: &str) -> u64 {
    posts
        .get_post_dto_all(&PostKeyword::new(kind, value), &all())
        .await
        .unwrap()
        .total_elements
}

fn titles(posts: &[quill_shared::dto::PostDto]) -> Vec<&str> {
    posts.iter().map(|p| p.title.as_str()).collect()
}

#[tokio::test]
async fn keyword_type_restricts_the_searched_field() {
    for s in backends().await {
        let author = s.user("alice").await;
        s.post(author, "alpha", "zebra crossing").await;

        let cases = [
            (PostKeywordType::Title, "zebra", 0),
            (PostKeywordType::Content, "zebra", 1),
            (PostKeywordType::Title, "ALPHA", 1),
            (PostKeywordType::Content, "alpha", 0),
            (PostKeywordType::TitleAndContent, "zebra", 1),
        ];
        for (kind, value, expected) in cases {
            assert_eq!(
                hits(&s.posts, kind, value).await,
                expected,
                "{} {kind} {value}",
                s.backend
            );
        }
    }
}

#[tokio::test]
async fn title_search_finds_exactly_one_of_five() {
    for s in backends().await {
        let author = s.user("alice").await;
        for i in 1..=5 {
            s.post(author, &format!("title{i}"), "body").await;
        }

        let keyword = PostKeyword::parse(Some("TITLE"), Some("title3")).unwrap();
        let page = s.posts.get_post_dto_all(&keyword, &all()).await.unwrap();

        assert_eq!(titles(&page.content), vec!["title3"], "{}", s.backend);
        assert_eq!(page.content[0].author_name.as_deref(), Some("alice"));
    }
}

#[tokio::test]
async fn like_wildcards_in_a_keyword_match_literally() {
    for s in backends().await {
        let author = s.user("alice").await;
        s.post(author, "50% off", "sale").await;
        s.post(author, "500 offers", "sale").await;

        let keyword = PostKeyword::new(PostKeywordType::Title, "50%");
        let page = s.posts.get_post_dto_all(&keyword, &all()).await.unwrap();

        assert_eq!(titles(&page.content), vec!["50% off"], "{}", s.backend);
    }
}

#[tokio::test]
async fn soft_deleted_posts_only_show_in_the_admin_listing() {
    for s in backends().await {
        let author = s.user("alice").await;
        let kept = s.post(author, "kept", "c").await;
        let gone = s.post(author, "gone", "c").await;

        s.posts.soft_delete_my_post(gone, author).await.unwrap();

        let any = PostKeyword::any();
        let listed = s.posts.get_post_dto_all(&any, &all()).await.unwrap();
        assert_eq!(titles(&listed.content), vec!["kept"], "{}", s.backend);

        let mine = s.posts.get_my_post_dto_all(author, &any, &all()).await.unwrap();
        assert_eq!(mine.total_elements, 1, "{}", s.backend);

        assert!(matches!(
            s.posts.get_by_id(gone).await,
            Err(DomainError::NotFound { .. })
        ));
        assert_eq!(s.posts.get_by_id(kept).await.unwrap().title, "kept");

        let sort = Sort::by(PostSortField::Title, Direction::Asc);
        let admin = s.posts.get_all_including_deleted(&any, &sort).await.unwrap();
        assert_eq!(titles(&admin), vec!["gone", "kept"], "{}", s.backend);

        assert!(matches!(
            s.posts.soft_delete_my_post(gone, author).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}

#[tokio::test]
async fn pages_concatenate_to_the_full_listing() {
    for s in backends().await {
        let author = s.user("alice").await;
        for i in 0..7 {
            s.post(author, &format!("post {}", i % 3), "same").await;
        }

        let sort = Sort::by(PostSortField::Title, Direction::Desc);
        let full = s
            .posts
            .get_post_dto_all(&PostKeyword::any(), &PageRequest::new(0, 100, sort.clone()).unwrap())
            .await
            .unwrap();

        let mut stitched = Vec::new();
        let mut page_count = 0;
        for page in 0.. {
            let request = PageRequest::new(page, 3, sort.clone()).unwrap();
            let page = s.posts.get_post_dto_all(&PostKeyword::any(), &request).await.unwrap();
            assert_eq!(page.total_elements, 7);
            assert_eq!(page.total_pages, 3, "{}", s.backend);
            page_count += 1;
            let more = page.has_next();
            stitched.extend(page.content.into_iter().map(|p| p.id));
            if !more {
                break;
            }
        }

        let expected: Vec<Uuid> = full.content.iter().map(|p| p.id).collect();
        assert_eq!(page_count, 3);
        assert_eq!(stitched, expected, "{}", s.backend);
    }
}

#[tokio::test]
async fn the_farthest_page_is_empty_and_beyond_it_is_rejected() {
    for s in backends().await {
        let author = s.user("alice").await;
        s.post(author, "only", "c").await;

        let last = i64::MAX as u64 / 100;
        let request = PageRequest::<PostSortField>::of(last, 100).unwrap();
        let page = s.posts.get_post_dto_all(&PostKeyword::any(), &request).await.unwrap();
        assert!(page.content.is_empty(), "{}", s.backend);
        assert_eq!(page.total_elements, 1, "{}", s.backend);

        assert!(matches!(
            PageRequest::<PostSortField>::of(u64::MAX / 2, 20),
            Err(DomainError::InvalidArgument(_))
        ));
    }
}

#[tokio::test]
async fn only_the_author_may_edit_or_delete() {
    for s in backends().await {
        let alice = s.user("alice").await;
        let mallory = s.user("mallory").await;
        let post = s.post(alice, "mine", "c").await;

        assert!(matches!(
            s.posts.update("hijacked", "c", post, mallory, &[]).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            s.posts.soft_delete_my_post(post, mallory).await,
            Err(DomainError::Forbidden(_))
        ));
        assert_eq!(s.posts.get_by_id(post).await.unwrap().title, "mine", "{}", s.backend);
    }
}

#[tokio::test]
async fn reading_twice_adds_two_views() {
    for s in backends().await {
        let author = s.user("alice").await;
        let post = s.post(author, "popular", "c").await;
        let before = s.posts.get_by_id(post).await.unwrap().views;

        s.posts.get_by_id_and_increase_views(post).await.unwrap();
        let dto = s.posts.get_post_dto_by_id_and_increase_views(post).await.unwrap();

        assert_eq!(dto.views, before + 2, "{}", s.backend);
        assert_eq!(s.posts.get_by_id(post).await.unwrap().views, before + 2);
        assert!(matches!(
            s.posts.get_by_id_and_increase_views(Uuid::new_v4()).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}

#[tokio::test]
async fn update_replaces_content_and_tags() {
    for s in backends().await {
        let author = s.user("alice").await;
        let post = s.post(author, "draft", "old").await;

        let tags = vec!["Rust".to_string(), " rust ".to_string(), "web".to_string()];
        s.posts.update("  final ", "new", post, author, &tags).await.unwrap();
        let dto = s.posts.get_post_dto_by_id(post).await.unwrap();
        assert_eq!(dto.title, "final", "{}", s.backend);
        assert_eq!(dto.content, "new");
        assert_eq!(dto.tags, vec!["rust", "web"], "{}", s.backend);

        s.posts.update("final", "new", post, author, &[]).await.unwrap();
        let dto = s.posts.get_post_dto_by_id(post).await.unwrap();
        assert!(dto.tags.is_empty(), "{}", s.backend);

        assert!(matches!(
            s.posts.update(" ", "new", post, author, &[]).await,
            Err(DomainError::InvalidArgument(_))
        ));
    }
}

#[tokio::test]
async fn replies_are_excluded_from_root_posts() {
    for s in backends().await {
        let author = s.user("alice").await;
        let root = s.post(author, "root", "c").await;
        let reply = s
            .posts
            .register_reply(author, root, "re: root", "c")
            .await
            .unwrap();

        let roots = s.posts.get_my_root_posts(author).await.unwrap();
        assert_eq!(roots.total, 1, "{}", s.backend);
        assert_eq!(titles(&roots.posts), vec!["root"]);

        let dto = s.posts.get_post_dto_by_id(reply).await.unwrap();
        assert_eq!(dto.parent_id, Some(root));
    }
}

#[tokio::test]
async fn replies_need_an_active_parent_and_known_author() {
    for s in backends().await {
        let author = s.user("alice").await;
        let parent = s.post(author, "parent", "c").await;
        s.posts.soft_delete_my_post(parent, author).await.unwrap();

        assert!(matches!(
            s.posts.register_reply(author, parent, "re", "c").await,
            Err(DomainError::NotFound { entity_type: "Post", .. })
        ));
        assert!(matches!(
            s.posts.register_post(Uuid::new_v4(), "t", "c").await,
            Err(DomainError::NotFound { entity_type: "User", .. })
        ));
    }
}
