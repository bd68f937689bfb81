//! Domain layer: stored entities, API DTOs, auth models and money handling.

pub mod entities;
pub mod dto;
pub mod models;
pub mod money;
