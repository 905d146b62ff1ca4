//! Search: iterative deepening alpha-beta with PV and subtree caches

pub mod params;
pub mod search;
pub mod stats;
pub mod tables;
pub mod worker;

pub use self::params::SearchParams;
pub use self::search::{Search, SearchInfo, SearchOutcome, MIN_REDUCE_LIMIT};
pub use self::stats::SearchStats;
pub use self::tables::{PvTable, SubtreeTable};
pub use self::worker::{SearchEvent, SearchJob, SearchWorker};
