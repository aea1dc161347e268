//! Connect proxy: delegates connection authentication of a real-time
//! server to an external backend and maps its verdict onto a connect reply.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
