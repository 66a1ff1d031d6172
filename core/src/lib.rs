//! Staff attendance desk: roster classification, staffing reconciliation,
//! bulk roster edits and saved daily summaries over a SQLite roster store.

pub mod bulk_parser;
pub mod classification;
pub mod config;
pub mod day_summary;
pub mod demo;
pub mod desk;
pub mod error;
pub mod event;
pub mod model;
pub mod name_generator;
pub mod rng;
pub mod slug;
pub mod staffing;
pub mod store;
pub mod types;
pub mod update;
pub mod validation;
