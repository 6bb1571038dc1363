//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI glue decoupled from storage details.

pub mod inventory_service;
pub mod library_service;
