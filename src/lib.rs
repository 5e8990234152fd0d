pub mod args;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod response;
pub mod server;
pub mod tools;
