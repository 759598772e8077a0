pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod generation;
pub mod jobs;
pub mod state;
pub mod users;
