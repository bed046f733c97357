pub mod driver;
pub mod executor;
pub mod factory;
