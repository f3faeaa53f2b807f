//! Core domain types for the Slotbook booking service: models, request and
//! response DTOs, and the error taxonomy shared by the database and API
//! crates.

pub mod errors;
pub mod models;
