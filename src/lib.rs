// src/lib.rs

pub mod config;
pub mod llm;
pub mod server;
