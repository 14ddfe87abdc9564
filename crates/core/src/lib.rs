//! Core library: catalog, filtering, view models, page loading and rendering.

pub mod card;
pub mod catalog;
pub mod config;
pub mod hero;
pub mod html;
pub mod index;
pub mod markdown;
pub mod models;
pub mod page;
pub mod routes;
pub mod search;
pub mod sidebar;
pub mod site;
