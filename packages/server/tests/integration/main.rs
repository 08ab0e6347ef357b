mod catalog;
mod common;
mod product;
