//! Database access for sca-server
//!
//! Write functions take a `&mut SqliteConnection` so callers can run them
//! inside one transaction; read functions take the pool.

pub mod consultants;
pub mod consultations;
pub mod scores;

pub use consultants::upsert_consultant;
pub use consultations::{insert_consultation, list_consultation_details};
pub use scores::insert_score;
