//! EV charging server.
//!
//! Finds charging stations near a point and plans long trips with
//! charging stops so the vehicle never runs out of range.

pub mod browser;
pub mod cache;
pub mod config;
pub mod directory;
pub mod domain;
pub mod geo;
pub mod planner;
pub mod stations;
pub mod vehicles;
pub mod web;
