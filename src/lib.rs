//! Bearer-token (JWT) protected demo API.
//!
//! Request path: HTTP layers → access gate (`middleware::auth`) →
//! `AuthenticationManager` (decode → convert → directory lookup) → handlers.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use app::app;
