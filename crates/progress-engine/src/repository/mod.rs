//! 数据库仓储层
//!
//! 每个实体一个仓储，服务层依赖 trait 抽象以便 mock 测试。
//! 并发安全依赖自然键上的唯一约束与原子更新语句，而非应用层加锁。

mod award_repo;
mod badge_repo;
mod content_repo;
mod learner_repo;
mod progress_repo;
mod traits;

pub use award_repo::AwardRepository;
pub use badge_repo::BadgeRepository;
pub use content_repo::ContentUnitRepository;
pub use learner_repo::LearnerRepository;
pub use progress_repo::ProgressRepository;
pub use traits::{
    AwardRepositoryTrait, BadgeRepositoryTrait, ContentUnitRepositoryTrait,
    LearnerRepositoryTrait, ProgressRepositoryTrait,
};

#[cfg(test)]
pub use traits::{
    MockAwardRepositoryTrait, MockBadgeRepositoryTrait, MockContentUnitRepositoryTrait,
    MockLearnerRepositoryTrait, MockProgressRepositoryTrait,
};
