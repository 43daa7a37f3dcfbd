//! Car-share trip ledger library modules.
//!
//! Users form car-shares and record trips; every trip carries a cumulative
//! snapshot of distance driven and ridden per user within its car-share.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::Trace;
