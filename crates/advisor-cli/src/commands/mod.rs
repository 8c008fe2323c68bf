pub mod chat;
pub mod helper;
pub mod products;
pub mod render;
