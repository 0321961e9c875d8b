//! # Task API
//!
//! A single-resource task REST service built with Axum, SQLx, and Tokio.
pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
