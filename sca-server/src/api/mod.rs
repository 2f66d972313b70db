//! HTTP API handlers for sca-server

pub mod buildinfo;
pub mod consultations;
pub mod cors;
pub mod health;
pub mod intake;
pub mod ui;

pub use buildinfo::get_build_info;
pub use consultations::{list_consultations, process_consultation};
pub use cors::{cors_layer, preflight};
pub use health::health_routes;
pub use intake::process_email;
pub use ui::{serve_app_js, serve_cards, serve_index};
