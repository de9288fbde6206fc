//! 进度仓储
//!
//! 进度记录的 upsert 与资格评估所需的聚合查询。

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::PgPool;

use super::traits::ProgressRepositoryTrait;
use crate::error::Result;
use crate::models::{CompletionChanges, CompletionUpsert, ContentKind, ProgressRecord};

/// 进度仓储
///
/// 同一 (learner_id, content_unit_id) 的并发写入由主键约束收敛为
/// 一条记录，翻转判定在该行的行锁下串行化，不使用应用层锁。
pub struct ProgressRepository {
    pool: PgPool,
}

impl ProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressRepositoryTrait for ProgressRepository {
    /// 插入或合并进度记录
    ///
    /// 合并语义：
    /// - score 仅在输入提供时替换
    /// - time_spent_seconds 取 GREATEST（单调不减）
    /// - completed 取逻辑或（单调）
    /// - completed_at 只在首次翻转时写入
    ///
    /// 翻转检测：在行锁下读取更新前的 completed 再执行合并更新。
    /// 并发重复提交在 FOR UPDATE 处串行化，输掉的一方解锁后读到的
    /// 已经是 completed = true，不会重复上报翻转。
    async fn upsert_completion(
        &self,
        learner_id: i64,
        content_unit_id: i64,
        changes: CompletionChanges,
        now: DateTime<Utc>,
    ) -> Result<CompletionUpsert> {
        // PostgreSQL timestamptz 为微秒精度，写入前对齐避免回读不等
        let now = now.trunc_subsecs(6);

        let mut tx = self.pool.begin().await?;

        // 行不存在时先建空记录，并发创建由主键上的 ON CONFLICT 吸收
        sqlx::query(
            r#"
            INSERT INTO progress_records
                (learner_id, content_unit_id, time_spent_seconds, completed, created_at, updated_at)
            VALUES ($1, $2, 0, FALSE, $3, $3)
            ON CONFLICT (learner_id, content_unit_id) DO NOTHING
            "#,
        )
        .bind(learner_id)
        .bind(content_unit_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let was_completed = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT completed
            FROM progress_records
            WHERE learner_id = $1 AND content_unit_id = $2
            FOR UPDATE
            "#,
        )
        .bind(learner_id)
        .bind(content_unit_id)
        .fetch_one(&mut *tx)
        .await?;

        let record = sqlx::query_as::<_, ProgressRecord>(
            r#"
            UPDATE progress_records SET
                score = COALESCE($3, score),
                time_spent_seconds = GREATEST(time_spent_seconds,
                                              COALESCE($4, time_spent_seconds)),
                completed = completed OR COALESCE($5, FALSE),
                completed_at = COALESCE(completed_at,
                                        CASE WHEN COALESCE($5, FALSE) THEN $6 END),
                updated_at = $6
            WHERE learner_id = $1 AND content_unit_id = $2
            RETURNING learner_id, content_unit_id, score, time_spent_seconds,
                      completed, completed_at, created_at, updated_at
            "#,
        )
        .bind(learner_id)
        .bind(content_unit_id)
        .bind(changes.score)
        .bind(changes.time_spent_seconds)
        .bind(changes.completed)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let completed_transitioned = !was_completed && record.completed;

        Ok(CompletionUpsert {
            record,
            completed_transitioned,
        })
    }

    async fn get_progress(
        &self,
        learner_id: i64,
        content_unit_id: i64,
    ) -> Result<Option<ProgressRecord>> {
        let record = sqlx::query_as::<_, ProgressRecord>(
            r#"
            SELECT learner_id, content_unit_id, score, time_spent_seconds,
                   completed, completed_at, created_at, updated_at
            FROM progress_records
            WHERE learner_id = $1 AND content_unit_id = $2
            "#,
        )
        .bind(learner_id)
        .bind(content_unit_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_progress(&self, learner_id: i64) -> Result<Vec<ProgressRecord>> {
        let records = sqlx::query_as::<_, ProgressRecord>(
            r#"
            SELECT learner_id, content_unit_id, score, time_spent_seconds,
                   completed, completed_at, created_at, updated_at
            FROM progress_records
            WHERE learner_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn count_completed(&self, learner_id: i64, kind: Option<ContentKind>) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM progress_records p
            JOIN content_units c ON c.id = p.content_unit_id
            WHERE p.learner_id = $1
              AND p.completed
              AND ($2::varchar IS NULL OR c.kind = $2)
            "#,
        )
        .bind(learner_id)
        .bind(kind)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn max_completed_score(
        &self,
        learner_id: i64,
        kind: Option<ContentKind>,
    ) -> Result<Option<i32>> {
        let max = sqlx::query_scalar::<_, Option<i32>>(
            r#"
            SELECT MAX(p.score)
            FROM progress_records p
            JOIN content_units c ON c.id = p.content_unit_id
            WHERE p.learner_id = $1
              AND p.completed
              AND p.score IS NOT NULL
              AND ($2::varchar IS NULL OR c.kind = $2)
            "#,
        )
        .bind(learner_id)
        .bind(kind)
        .fetch_one(&self.pool)
        .await?;

        Ok(max)
    }
}
