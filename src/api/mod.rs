pub mod map_service;
pub mod service;
