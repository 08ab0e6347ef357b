pub mod catalog;
pub mod me;
pub mod order;
