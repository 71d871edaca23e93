pub mod dec;
pub mod rooms;
