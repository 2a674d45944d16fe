// src/lib.rs

//! DEV.to top articles RSS library

pub mod error;
pub mod feed;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
