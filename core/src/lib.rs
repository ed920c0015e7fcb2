pub mod catalog;
pub mod command;
pub mod config;
pub mod economics;
pub mod effects;
pub mod engine;
pub mod error;
pub mod event;
pub mod event_source;
pub mod event_subsystem;
pub mod growth_subsystem;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod team;
pub mod transactions;
pub mod types;
