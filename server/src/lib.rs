pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;
