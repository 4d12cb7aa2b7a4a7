//! Presentation Layer
//!
//! HTTP handlers and DTOs for the card endpoints.

pub mod dto;
pub mod handlers;
pub mod router;
