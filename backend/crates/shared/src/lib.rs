//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" shared by every card endpoint:
//! - The unified error type and result alias
//! - Error classification mapped onto HTTP status codes
//! - Conversions from the foreign errors the handlers run into
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all cards.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
