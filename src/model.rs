pub mod addr;
pub mod versioned;
pub mod config;

pub mod space;
pub mod layout;
pub mod viewport;
pub mod mapper;
pub mod selection;
pub mod comment;
pub mod dump;
