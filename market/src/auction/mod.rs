pub mod coordinator;
pub mod dispatcher;
pub mod record;

pub use coordinator::{AuctionCoordinator, BidReceipt, CloseReceipt, NotificationStatus, OpenReceipt};
pub use dispatcher::{Command, CommandDispatcher, DispatchOutcome};
pub use record::AuctionRecord;
