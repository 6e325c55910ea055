pub mod error;
pub mod gateway;
pub mod input;
pub mod response;
pub mod service;
