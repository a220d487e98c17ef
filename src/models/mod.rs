pub mod import;
pub mod match_record;
pub mod reference;
pub mod stats;

pub use import::{ImportLog, ImportStatus, ImportTrigger, SyncStatus};
pub use match_record::{GameResult, Match, Placement};
pub use reference::{HeroInfo, MinionInfo};
pub use stats::{
    CompositionStat, DurationStats, GlobalStat, HeroStat, PlacementShare, RatingPoint,
    StreakBucket, TrendPoint,
};
