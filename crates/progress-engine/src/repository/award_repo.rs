//! 发放记录仓储
//!
//! 至多一次发放由 (learner_id, badge_id) 主键与条件插入保证：
//! ON CONFLICT DO NOTHING，冲突时由调用方回读既有记录。

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::PgPool;

use super::traits::AwardRepositoryTrait;
use crate::error::Result;
use crate::models::AwardRecord;

/// 发放记录仓储
pub struct AwardRepository {
    pool: PgPool,
}

impl AwardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AwardRepositoryTrait for AwardRepository {
    /// 条件插入发放记录
    ///
    /// 返回 Some 表示本次调用真正创建了记录；返回 None 表示记录已存在
    /// （包括并发发放中输掉竞争的一方），调用方据此决定是否累计徽章积分。
    async fn insert_award_if_absent(
        &self,
        learner_id: i64,
        badge_id: i64,
        awarded_at: DateTime<Utc>,
    ) -> Result<Option<AwardRecord>> {
        let record = sqlx::query_as::<_, AwardRecord>(
            r#"
            INSERT INTO award_records (learner_id, badge_id, awarded_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (learner_id, badge_id) DO NOTHING
            RETURNING learner_id, badge_id, awarded_at
            "#,
        )
        .bind(learner_id)
        .bind(badge_id)
        .bind(awarded_at.trunc_subsecs(6))
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get_award(&self, learner_id: i64, badge_id: i64) -> Result<Option<AwardRecord>> {
        let record = sqlx::query_as::<_, AwardRecord>(
            r#"
            SELECT learner_id, badge_id, awarded_at
            FROM award_records
            WHERE learner_id = $1 AND badge_id = $2
            "#,
        )
        .bind(learner_id)
        .bind(badge_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_awards(&self, learner_id: i64) -> Result<Vec<AwardRecord>> {
        let records = sqlx::query_as::<_, AwardRecord>(
            r#"
            SELECT learner_id, badge_id, awarded_at
            FROM award_records
            WHERE learner_id = $1
            ORDER BY awarded_at DESC
            "#,
        )
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_awarded_badge_ids(&self, learner_id: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT badge_id
            FROM award_records
            WHERE learner_id = $1
            "#,
        )
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
