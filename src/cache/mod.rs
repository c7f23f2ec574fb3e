/// Cached read path for the aggregation API.
///
/// All reads from the external service go through `QueryClient`, which
/// deduplicates concurrent requests by key, serves stale data while a
/// background refresh runs, retries a failed fetch exactly once, and evicts
/// entries whose retention window has lapsed without observers.
///
/// Submodules:
/// - `policy` - per-endpoint-class staleness and retention table
/// - `client` - the poll-driven query client and its snapshot states

pub mod client;
pub mod policy;

pub use client::{PendingFetch, QueryClient, QueryKey, QuerySnapshot, QueryStatus};
pub use policy::{policy_for, CachePolicy, EndpointClass};
