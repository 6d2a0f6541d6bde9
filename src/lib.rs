//! Supawatch - movie and TV browsing proxy over the TMDB API.
//!
//! The library crate exposes the server, upstream client and playlist tool
//! for the binary and for integration testing.

pub mod config;
pub mod playlist;
pub mod select;
pub mod server;
pub mod tmdb;
