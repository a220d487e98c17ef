pub mod client;
pub mod endpoints;
#[cfg(test)]
pub mod fake;

pub use client::{ApiClient, ApiError, DashboardApi};
pub use endpoints::{Endpoint, Fetched};
