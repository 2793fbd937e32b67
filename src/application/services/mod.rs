// src/application/services/mod.rs
pub mod library;
