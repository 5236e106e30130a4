//! BitPulse Reader - A web front end for a crypto news aggregator
//!
//! This crate serves the reading interface for an aggregation backend. It
//! fetches feeds and articles over the backend's REST API and renders them
//! as bilingual (Persian/English) HTML pages.

pub mod cache;
pub mod client;
pub mod config;
pub mod direction;
pub mod feeds;
pub mod i18n;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod text;
pub mod time;
pub mod views;
