pub mod festivals;
pub mod health;
