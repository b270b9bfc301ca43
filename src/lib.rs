//! CollabAlign — guided personality, skills and co-founder alignment core.

pub mod config;
pub mod error;
pub mod llm;
pub mod session;
