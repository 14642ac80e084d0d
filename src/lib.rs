//! Kingdoms Battle - turn-based battle resolution engine

pub mod battle;
pub mod core;
pub mod scenario;
