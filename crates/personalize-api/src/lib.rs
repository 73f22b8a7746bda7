//! Personalize API Library
//!
//! The `get-recommendations` Lambda: resolves a user id from the API Gateway
//! path and returns the campaign's recommended items as JSON.

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod error;
pub mod handler;
pub mod recommender;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use recommender::{PersonalizeRecommender, RecommendedItem, Recommender};
