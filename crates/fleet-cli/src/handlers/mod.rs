pub mod avatar;
pub mod config;
pub mod vehicles;
