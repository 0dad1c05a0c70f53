pub mod host;
pub mod mac;
pub mod os;
pub mod platform;
pub mod range;
pub mod target;
