pub mod stats;
pub mod user;

pub use stats::{DashboardStats, DomainCount, DomainInitialCount, NameLengthSummary};
pub use user::{NameLengthPolicy, RefreshOutcome, User, UserView};
