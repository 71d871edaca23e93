pub mod client;
pub mod http;
pub mod models;
pub mod room;

pub use client::Pulse;
pub use http::PulseError;
pub use room::{Room, Rooms};

pub const DEFAULT_BASE_URL: &str = "https://api.pulse.neat.no/v1";
