mod common;

use std::sync::Arc;

use quill_core::DomainError;
use quill_core::ports::PasswordService;
use quill_core::query::{PostKeyword, Sort};
use quill_infra::Argon2PasswordService;

use common::{backends, memory_with};

#[tokio::test]
async fn registration_validates_and_rejects_taken_names() {
    for s in backends().await {
        let user = s.users.register("  alice ", "password123").await.unwrap();
        assert_eq!(user.name, "alice", "{}", s.backend);
        assert_eq!(s.users.get_by_id(user.id).await.unwrap().name, "alice");

        assert!(matches!(
            s.users.register("alice", "password456").await,
            Err(DomainError::Duplicate(_))
        ));
        assert!(matches!(
            s.users.register(" ", "password123").await,
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            s.users.register("bob", "short").await,
            Err(DomainError::InvalidArgument(_))
        ));
    }
}

#[tokio::test]
async fn stored_password_is_an_argon2_hash() {
    let argon2 = Arc::new(Argon2PasswordService::new());
    let s = memory_with(argon2.clone());

    let user = s.users.register("carol", "correct horse").await.unwrap();

    assert_ne!(user.password_hash, "correct horse");
    assert!(user.password_hash.starts_with("$argon2"));
    assert!(argon2.verify("correct horse", &user.password_hash).unwrap());
}

#[tokio::test]
async fn purge_removes_users_and_everything_they_wrote() {
    for s in backends().await {
        let alice = s.user("alice").await;
        let bob = s.user("bob").await;
        let post = s.post(alice, "doomed", "c").await;
        s.comments.create_comment(post, "me too").await.unwrap();
        s.likes.like_post(bob, post).await.unwrap();

        assert_eq!(s.users.purge_all().await.unwrap(), 2, "{}", s.backend);

        let everything = s
            .posts
            .get_all_including_deleted(&PostKeyword::any(), &Sort::default())
            .await
            .unwrap();
        assert!(everything.is_empty(), "{}", s.backend);
        assert!(matches!(
            s.users.get_by_id(alice).await,
            Err(DomainError::NotFound { .. })
        ));

        // The name is free again.
        s.user("alice").await;
    }
}
