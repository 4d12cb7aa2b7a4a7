//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - GitHub token pool discovery
//! - Rate limit detection and credential-rotating retries
//! - GitHub GraphQL/REST transport
//! - Cache-Control policy

pub mod cache;
pub mod credentials;
pub mod github;
pub mod rate_limit;
pub mod retry;
