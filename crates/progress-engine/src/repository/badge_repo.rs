//! 徽章目录仓储
//!
//! 徽章定义在部署期播种，运行期只读。

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::BadgeRepositoryTrait;
use crate::error::Result;
use crate::models::BadgeDefinition;

/// 徽章目录仓储
pub struct BadgeRepository {
    pool: PgPool,
}

impl BadgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BadgeRepositoryTrait for BadgeRepository {
    async fn list_badges(&self) -> Result<Vec<BadgeDefinition>> {
        let badges = sqlx::query_as::<_, BadgeDefinition>(
            r#"
            SELECT id, name, description, icon_url, category, points, criterion, created_at
            FROM badges
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(badges)
    }

    async fn get_badge(&self, id: i64) -> Result<Option<BadgeDefinition>> {
        let badge = sqlx::query_as::<_, BadgeDefinition>(
            r#"
            SELECT id, name, description, icon_url, category, points, criterion, created_at
            FROM badges
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(badge)
    }
}
