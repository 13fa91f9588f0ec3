pub mod db;
pub mod error;
pub mod models;

pub use db::Db;
pub use error::{DbError, Result};
