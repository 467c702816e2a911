pub mod changes;
pub mod error;
pub mod health;

pub use error::AppError;
