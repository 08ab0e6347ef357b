pub mod pizza;
pub mod pizza_order;
