//! 内容单元仓储
//!
//! 内容单元由内容管理子系统负责写入，本引擎只读取 kind 标签。

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::ContentUnitRepositoryTrait;
use crate::error::Result;
use crate::models::ContentUnit;

/// 内容单元仓储
pub struct ContentUnitRepository {
    pool: PgPool,
}

impl ContentUnitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentUnitRepositoryTrait for ContentUnitRepository {
    async fn get_content_unit(&self, id: i64) -> Result<Option<ContentUnit>> {
        let unit = sqlx::query_as::<_, ContentUnit>(
            r#"
            SELECT id, title, kind, created_at
            FROM content_units
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }
}
