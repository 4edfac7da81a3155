// src/core/mod.rs
pub mod analyzer;
pub mod classifier;
pub mod converter;
pub mod engine;
pub mod protect;
pub mod rules;
pub mod transliterate;
pub mod types;
