//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `studyhub_test`)
//!   `TEST_DB_PASSWORD` (default: `studyhub_test`)
//!   `TEST_DB_NAME` (default: `studyhub_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, SqlxPostgresConnector};
use sea_orm_migration::MigratorTrait;
use studyhub_common::IdGenerator;
use studyhub_db::entities::{comment, course, question, question::QuestionType, user};
use studyhub_db::migrations::Migrator;
use studyhub_db::repositories::{
    CommentRepository, CourseRepository, LikeRepository, QuestionRepository, UserRepository,
};
use studyhub_db::test_utils::{TestDatabase, TestDbConfig};

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

async fn seed_question(
    conn: &Arc<DatabaseConnection>,
    id_gen: &IdGenerator,
) -> (user::Model, question::Model) {
    let users = UserRepository::new(conn.clone());
    let courses = CourseRepository::new(conn.clone());
    let questions = QuestionRepository::new(conn.clone());

    let user = users
        .create(user::ActiveModel {
            id: Set(id_gen.generate()),
            email: Set(format!("{}@students.example.edu", id_gen.generate())),
            student_id: Set("alice".to_string()),
            role: Set(user::UserRole::User),
            magic_link_hash: Set(None),
            magic_link_expires_at: Set(None),
            magic_link_requested_at: Set(None),
            session_version: Set(0),
            blocked_until: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    let course = courses
        .create(course::ActiveModel {
            id: Set(id_gen.generate()),
            code: Set(format!("CS{}", &id_gen.generate()[..6])),
            name: Set("Data Structures".to_string()),
            created_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();

    let question = questions
        .create(question::ActiveModel {
            id: Set(id_gen.generate()),
            user_id: Set(user.id.clone()),
            course_id: Set(course.id),
            question_type: Set(QuestionType::Essay),
            text: Set("Compare BFS and DFS.".to_string()),
            options: Set(None),
            likes_count: Set(0),
            reports_count: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    (user, question)
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_like_toggle_roundtrip() {
    let db = TestDatabase::create_unique().await.unwrap();
    Migrator::up(db.connection(), None).await.unwrap();

    // `DatabaseConnection` is not `Clone` while sea-orm's `mock` feature is
    // enabled (pulled in by dev-dependencies), so rebuild an owned handle
    // from the shared sqlx pool instead.
    let conn = Arc::new(SqlxPostgresConnector::from_sqlx_postgres_pool(
        db.connection().get_postgres_connection_pool().clone(),
    ));
    let id_gen = IdGenerator::new();
    let (user, question) = seed_question(&conn, &id_gen).await;

    let likes = LikeRepository::new(conn.clone());
    let questions = QuestionRepository::new(conn.clone());

    let (liked, count) = likes
        .toggle_question_like(&id_gen.generate(), &user.id, &question.id)
        .await
        .unwrap();
    assert!(liked);
    assert_eq!(count, 1);

    let (liked, count) = likes
        .toggle_question_like(&id_gen.generate(), &user.id, &question.id)
        .await
        .unwrap();
    assert!(!liked);
    assert_eq!(count, 0);

    let stored = questions.get_by_id(&question.id).await.unwrap();
    assert_eq!(stored.likes_count, 0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_like_counter_tracks_two_users() {
    let db = TestDatabase::create_unique().await.unwrap();
    Migrator::up(db.connection(), None).await.unwrap();

    // `DatabaseConnection` is not `Clone` while sea-orm's `mock` feature is
    // enabled (pulled in by dev-dependencies), so rebuild an owned handle
    // from the shared sqlx pool instead.
    let conn = Arc::new(SqlxPostgresConnector::from_sqlx_postgres_pool(
        db.connection().get_postgres_connection_pool().clone(),
    ));
    let id_gen = IdGenerator::new();
    let (first, question) = seed_question(&conn, &id_gen).await;

    let users = UserRepository::new(conn.clone());
    let second = users
        .create(user::ActiveModel {
            id: Set(id_gen.generate()),
            email: Set(format!("{}@students.example.edu", id_gen.generate())),
            student_id: Set("bob".to_string()),
            role: Set(user::UserRole::User),
            magic_link_hash: Set(None),
            magic_link_expires_at: Set(None),
            magic_link_requested_at: Set(None),
            session_version: Set(0),
            blocked_until: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    let likes = LikeRepository::new(conn.clone());

    let (_, count) = likes
        .toggle_question_like(&id_gen.generate(), &first.id, &question.id)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let (_, count) = likes
        .toggle_question_like(&id_gen.generate(), &second.id, &question.id)
        .await
        .unwrap();
    assert_eq!(count, 2);

    // First user withdraws; the second user's like stays counted.
    let (liked, count) = likes
        .toggle_question_like(&id_gen.generate(), &first.id, &question.id)
        .await
        .unwrap();
    assert!(!liked);
    assert_eq!(count, 1);
    assert!(likes
        .has_liked_question(&second.id, &question.id)
        .await
        .unwrap());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_comment_cascade_delete_leaves_no_orphans() {
    let db = TestDatabase::create_unique().await.unwrap();
    Migrator::up(db.connection(), None).await.unwrap();

    // `DatabaseConnection` is not `Clone` while sea-orm's `mock` feature is
    // enabled (pulled in by dev-dependencies), so rebuild an owned handle
    // from the shared sqlx pool instead.
    let conn = Arc::new(SqlxPostgresConnector::from_sqlx_postgres_pool(
        db.connection().get_postgres_connection_pool().clone(),
    ));
    let id_gen = IdGenerator::new();
    let (user, question) = seed_question(&conn, &id_gen).await;

    let comments = CommentRepository::new(conn.clone());

    let root = comments
        .create(comment::ActiveModel {
            id: Set(id_gen.generate()),
            question_id: Set(question.id.clone()),
            user_id: Set(user.id.clone()),
            text: Set("Top-level comment".to_string()),
            parent_comment_id: Set(None),
            likes_count: Set(0),
            reports_count: Set(0),
            replies_count: Set(0),
            created_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();

    let reply = comments
        .create(comment::ActiveModel {
            id: Set(id_gen.generate()),
            question_id: Set(question.id.clone()),
            user_id: Set(user.id.clone()),
            text: Set("First reply".to_string()),
            parent_comment_id: Set(Some(root.id.clone())),
            likes_count: Set(0),
            reports_count: Set(0),
            replies_count: Set(0),
            created_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();

    comments
        .create(comment::ActiveModel {
            id: Set(id_gen.generate()),
            question_id: Set(question.id.clone()),
            user_id: Set(user.id.clone()),
            text: Set("Nested reply".to_string()),
            parent_comment_id: Set(Some(reply.id.clone())),
            likes_count: Set(0),
            reports_count: Set(0),
            replies_count: Set(0),
            created_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();

    let deleted = comments.delete_cascade(&root).await.unwrap();
    assert_eq!(deleted, 3);

    assert!(comments.find_top_level(&question.id).await.unwrap().is_empty());
    assert!(comments.find_replies(&root.id).await.unwrap().is_empty());
    assert!(comments.find_replies(&reply.id).await.unwrap().is_empty());

    db.drop_database().await.unwrap();
}
