//! HTTP adapters - REST client implementing the API ports.

mod client;
mod dto;
mod error_detail;
mod flights;
mod notifications;
mod tickets;

pub use client::{join_url, map_status, RestClient, RestConfig};
pub use error_detail::extract_detail;
