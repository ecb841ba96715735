//! assistant-service: weather chat and document Q&A pipelines over a
//! language model, served over HTTP.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod startup;
