// src/lib.rs

//! parkscout library

pub mod console;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
