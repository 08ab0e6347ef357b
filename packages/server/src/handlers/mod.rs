pub mod assets;
pub mod catalog;
pub mod me;
pub mod orders;
pub mod products;
