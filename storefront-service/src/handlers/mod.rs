pub mod auth;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod supplier;
pub mod user;
