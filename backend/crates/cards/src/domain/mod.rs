//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Rank scoring and access control
//! - Domain entities (stats, languages, repositories, gists, contributions)
//! - Domain value objects (ResourceKind, LangsCount, ActivityDays)
//! - Domain services (aggregation, streak and activity maths)
//! - Source traits (interfaces)

pub mod access;
pub mod entities;
pub mod rank;
pub mod repository;
pub mod services;
pub mod value_objects;
