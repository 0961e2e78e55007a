pub mod stats;
pub mod tracker;

pub use stats::{DashboardStats, RecentActivity, StatsEngine};
pub use tracker::{Actor, BagSpec, QueryType, RegisterBaggage, TrackedBaggage, Tracker};
