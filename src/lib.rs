//! Company Data API Library
//!
//! Looks up the companies of an industry in the Companies House registry and
//! enriches them with a size tier, a display address and, optionally, their
//! persons with significant control.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Enrichment pipeline and its pure building blocks.
//! - `address`: Address fragment normalization.
//! - `age`: Age from partial birth dates.
//! - `config`: Configuration management.
//! - `db`: Registry connection factory.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `mappers`: Raw row to record mapping.
//! - `models`: Query, row and record types.
//! - `person_kind`: PSC kind to person type lookup.
//! - `pipeline`: Enrichment pipeline orchestration.
//! - `query_builder`: Company selection SQL.
//! - `routes`: Router construction.
//! - `size_classifier`: Account category to size tier.

pub mod api;
pub mod core;

pub mod address;
pub mod age;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod mappers;
pub mod models;
pub mod person_kind;
pub mod pipeline;
pub mod query_builder;
pub mod routes;
pub mod size_classifier;
