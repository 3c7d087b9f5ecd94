//! Support Chat - Mental health support chat backend
//!
//! Keeps per-session conversation history in memory, screens every user
//! message for crisis language, and relays ordinary turns to a language
//! model completion provider (OpenAI or Gemini).

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod observability;
pub mod ports;
pub mod startup;
