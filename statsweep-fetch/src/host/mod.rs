//! Host API implementations.
//!
//! - [`http`] - reqwest-backed [`Transport`](crate::transport::Transport)

pub mod http;
