pub mod connection;
pub mod entity;
pub mod models;
pub mod service;

pub use connection::{DatabaseError, ExecOutcome, MySqlConnection};
pub use entity::{Entity, PartialUpdate};
pub use service::{MySqlService, Page};
