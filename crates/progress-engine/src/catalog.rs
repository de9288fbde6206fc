//! 徽章目录
//!
//! 部署期播种的徽章定义在启动时整体载入内存，资格评估直接遍历快照，
//! 不在热路径上反复查库。运营更新种子后可调用 reload 热替换。

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use crate::error::Result;
use crate::models::BadgeDefinition;
use crate::repository::BadgeRepositoryTrait;

/// 徽章目录（内存快照）
pub struct BadgeCatalog {
    snapshot: ArcSwap<Vec<BadgeDefinition>>,
}

impl BadgeCatalog {
    /// 从给定的徽章定义构建目录（测试或静态配置场景）
    pub fn new(badges: Vec<BadgeDefinition>) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(badges),
        }
    }

    /// 从仓储载入全部徽章定义
    pub async fn load<R: BadgeRepositoryTrait>(repo: &R) -> Result<Self> {
        let badges = repo.list_badges().await?;
        info!(badge_count = badges.len(), "徽章目录已载入");
        Ok(Self::new(badges))
    }

    /// 重新载入目录并热替换快照
    ///
    /// 载入失败时保留旧快照
    pub async fn reload<R: BadgeRepositoryTrait>(&self, repo: &R) -> Result<()> {
        let badges = repo.list_badges().await?;
        info!(badge_count = badges.len(), "徽章目录已重载");
        self.snapshot.store(Arc::new(badges));
        Ok(())
    }

    /// 全部徽章定义
    pub fn all(&self) -> Arc<Vec<BadgeDefinition>> {
        self.snapshot.load_full()
    }

    /// 按 ID 查找徽章定义
    pub fn get(&self, id: i64) -> Option<BadgeDefinition> {
        self.snapshot.load().iter().find(|b| b.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }
}
