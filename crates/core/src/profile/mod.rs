//! Profile persistence boundary

pub mod ports;

pub use ports::ProfileRepository;
