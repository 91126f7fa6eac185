// Infrastructure module - timing policies and background plumbing
pub mod backoff;
pub mod network;
pub(crate) mod tasks;

pub use backoff::Backoff;
pub use network::NetworkStatus;
pub(crate) use tasks::TaskSlot;
