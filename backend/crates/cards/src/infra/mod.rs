//! Infrastructure Layer
//!
//! Upstream source implementations.

pub mod github;
pub mod wakatime;
