pub mod controller;
pub mod server;
