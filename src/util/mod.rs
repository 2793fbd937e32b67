// src/util/mod.rs
pub mod path;
pub mod testing;
