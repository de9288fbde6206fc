//! 数据库集成测试
//!
//! 验证依赖真实 PostgreSQL 语义的部分：ON CONFLICT 合并、翻转检测的
//! 原子性、条件插入、原子累加。需要可用的测试数据库
//! （TEST_DATABASE_URL），因此默认 ignore：
//!
//! ```text
//! cargo test -p progress-engine -- --ignored
//! ```

use std::sync::Arc;

use chrono::Utc;
use progress_engine::{
    AwardRepository, AwardRepositoryTrait, CompletionChanges, ContentKind, LearnerRepository,
    LearnerRepositoryTrait, ProgressRepository, ProgressRepositoryTrait,
};
use progress_shared::{Database, test_utils};
use sqlx::PgPool;

async fn test_pool() -> PgPool {
    let db = Database::connect(&test_utils::test_database_config())
        .await
        .expect("测试数据库不可用");
    db.run_migrations().await.expect("迁移失败");
    db.pool().clone()
}

async fn seed_learner(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO learners (display_name) VALUES ($1) RETURNING id",
    )
    .bind(test_utils::test_display_name("learner"))
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn seed_content(pool: &PgPool, kind: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO content_units (title, kind) VALUES ($1, $2) RETURNING id",
    )
    .bind(test_utils::test_display_name("content"))
    .bind(kind)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[tokio::test]
#[ignore]
async fn test_upsert_merges_and_detects_transition() {
    let pool = test_pool().await;
    let repo = ProgressRepository::new(pool.clone());
    let learner_id = seed_learner(&pool).await;
    let content_id = seed_content(&pool, "lesson").await;

    // 首次：有得分，未完成
    let first = repo
        .upsert_completion(
            learner_id,
            content_id,
            CompletionChanges {
                score: Some(80),
                time_spent_seconds: Some(120),
                completed: None,
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert!(!first.record.completed);
    assert!(!first.completed_transitioned);
    assert_eq!(first.record.score, Some(80));

    // 翻转完成态，省略 score：得分沿用，completed_at 写入
    let second = repo
        .upsert_completion(
            learner_id,
            content_id,
            CompletionChanges {
                score: None,
                time_spent_seconds: Some(60),
                completed: Some(true),
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert!(second.completed_transitioned);
    assert_eq!(second.record.score, Some(80));
    assert!(second.record.completed_at.is_some());
    // 耗时单调不减：120 > 60，保留 120
    assert_eq!(second.record.time_spent_seconds, 120);

    // 重复完成：不再翻转，completed_at 不被改写
    let third = repo
        .upsert_completion(
            learner_id,
            content_id,
            CompletionChanges {
                score: Some(95),
                time_spent_seconds: None,
                completed: Some(true),
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert!(!third.completed_transitioned);
    assert_eq!(third.record.completed_at, second.record.completed_at);
    assert_eq!(third.record.score, Some(95));

    // completed=false 不回退
    let fourth = repo
        .upsert_completion(
            learner_id,
            content_id,
            CompletionChanges {
                score: None,
                time_spent_seconds: None,
                completed: Some(false),
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert!(fourth.record.completed);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_completions_single_transition() {
    let pool = test_pool().await;
    let repo = Arc::new(ProgressRepository::new(pool.clone()));
    let learner_id = seed_learner(&pool).await;
    let content_id = seed_content(&pool, "typing").await;

    let changes = CompletionChanges {
        score: Some(100),
        time_spent_seconds: Some(30),
        completed: Some(true),
    };

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.upsert_completion(learner_id, content_id, changes, Utc::now())
                .await
                .unwrap()
        }));
    }

    let mut transitions = 0;
    for handle in handles {
        if handle.await.unwrap().completed_transitioned {
            transitions += 1;
        }
    }

    // 并发重复提交收敛为一条记录、恰好一次翻转
    assert_eq!(transitions, 1);
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM progress_records WHERE learner_id = $1 AND content_unit_id = $2",
    )
    .bind(learner_id)
    .bind(content_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore]
async fn test_same_timestamp_completions_single_transition() {
    // 翻转判定不依赖时间戳：两次调用携带完全相同的时间戳，
    // 也只有第一次上报翻转
    let pool = test_pool().await;
    let repo = ProgressRepository::new(pool.clone());
    let learner_id = seed_learner(&pool).await;
    let content_id = seed_content(&pool, "lesson").await;

    let now = Utc::now();
    let changes = CompletionChanges {
        score: Some(100),
        time_spent_seconds: Some(30),
        completed: Some(true),
    };

    let first = repo
        .upsert_completion(learner_id, content_id, changes, now)
        .await
        .unwrap();
    let second = repo
        .upsert_completion(learner_id, content_id, changes, now)
        .await
        .unwrap();

    assert!(first.completed_transitioned);
    assert!(!second.completed_transitioned);
    assert_eq!(second.record.completed_at, first.record.completed_at);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_awards_single_insert() {
    let pool = test_pool().await;
    let repo = Arc::new(AwardRepository::new(pool.clone()));
    let learner_id = seed_learner(&pool).await;
    // 种子目录中的 First Steps
    let badge_id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM badges WHERE name = 'First Steps'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.insert_award_if_absent(learner_id, badge_id, Utc::now())
                .await
                .unwrap()
        }));
    }

    let mut inserted = 0;
    for handle in handles {
        if handle.await.unwrap().is_some() {
            inserted += 1;
        }
    }
    assert_eq!(inserted, 1);
}

#[tokio::test]
#[ignore]
async fn test_add_points_is_atomic_under_concurrency() {
    let pool = test_pool().await;
    let repo = Arc::new(LearnerRepository::new(pool.clone()));
    let learner_id = seed_learner(&pool).await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.add_points(learner_id, 10).await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let learner = repo.get_learner(learner_id).await.unwrap().unwrap();
    assert_eq!(learner.points, 200);
}

#[tokio::test]
#[ignore]
async fn test_aggregates_respect_kind_filter() {
    let pool = test_pool().await;
    let repo = ProgressRepository::new(pool.clone());
    let learner_id = seed_learner(&pool).await;

    for (kind, score) in [("safety", 70), ("safety", 90), ("typing", 100)] {
        let content_id = seed_content(&pool, kind).await;
        repo.upsert_completion(
            learner_id,
            content_id,
            CompletionChanges {
                score: Some(score),
                time_spent_seconds: Some(60),
                completed: Some(true),
            },
            Utc::now(),
        )
        .await
        .unwrap();
    }

    assert_eq!(repo.count_completed(learner_id, None).await.unwrap(), 3);
    assert_eq!(
        repo.count_completed(learner_id, Some(ContentKind::Safety))
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        repo.max_completed_score(learner_id, Some(ContentKind::Safety))
            .await
            .unwrap(),
        Some(90)
    );
    assert_eq!(
        repo.max_completed_score(learner_id, Some(ContentKind::Coding))
            .await
            .unwrap(),
        None
    );
}
