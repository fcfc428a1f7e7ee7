pub mod item_store;
pub mod rating;
pub mod review_item;
pub mod review_session;
pub mod sm2;
pub mod statistics;

pub use item_store::ItemStore;
pub use rating::Rating;
pub use review_item::{ReviewHistoryEntry, ReviewItem};
pub use review_session::{ReviewResult, ReviewSession, SessionConfig};
pub use sm2::SchedulingPolicy;
pub use statistics::Statistics;
