pub mod error;
pub mod fetch;
pub mod filter;
pub mod loader;
pub mod model;
pub mod output;
pub mod scale;
pub mod time;
pub mod traffic;
pub mod view;

pub use error::TrafficError;
