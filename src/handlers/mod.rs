pub mod calculate;
pub mod health;
pub mod search;
pub mod users;
