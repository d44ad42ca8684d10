//! Server-rendered client info gateway.
//!
//! HTML form pages plus CRUD endpoints (submit, update, delete, search) over
//! a single PostgreSQL `client_info` table. Names are normalized to a
//! canonical lowercased key for storage and lookup; search responses render
//! the name in title case.

pub mod config;
pub mod db;
pub mod error;
pub mod web;
