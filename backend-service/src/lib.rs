//! Backend API: a single `GET /` answering with a greeting or the database clock.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
