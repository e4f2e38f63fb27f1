pub mod live;
pub mod memory;
pub mod remote;

pub use live::LiveQuery;
pub use memory::MemoryStore;
pub use remote::{RemoteStore, Subscription, TreeSnapshot};
