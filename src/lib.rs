//! Polytalk - Translation with Model Routing and Speech
//!
//! Translates text with a direct bilingual model when one is published, or
//! through two models chained over a pivot language otherwise, and renders
//! the result as synthesized speech.

pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod models;
pub mod translate;
pub mod speech;
pub mod history;
pub mod session;
pub mod workflow;
pub mod render;
