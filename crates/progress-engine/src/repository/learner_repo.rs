//! 学习者仓储
//!
//! 积分写入必须走 `add_points` 的存储层原子累加，
//! 禁止应用层先读后写（并发下会丢失更新）。

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::LearnerRepositoryTrait;
use crate::error::{ProgressError, Result};
use crate::models::Learner;

/// 学习者仓储
pub struct LearnerRepository {
    pool: PgPool,
}

impl LearnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LearnerRepositoryTrait for LearnerRepository {
    async fn get_learner(&self, id: i64) -> Result<Option<Learner>> {
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            SELECT id, display_name, points, created_at, updated_at
            FROM learners
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(learner)
    }

    /// 原子累加积分
    ///
    /// `points = points + $2` 在存储层执行，返回累加后的总分
    async fn add_points(&self, learner_id: i64, delta: i64) -> Result<i64> {
        let points = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE learners
            SET points = points + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING points
            "#,
        )
        .bind(learner_id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ProgressError::LearnerNotFound(learner_id))?;

        Ok(points)
    }
}
