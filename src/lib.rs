//! Register Wizard — three-step user registration with photo capture,
//! skills, and recovery questions.

pub mod client;
pub mod config;
pub mod error;
pub mod photo;
pub mod registration;
pub mod session;
pub mod terminal;
