pub mod asset;
pub mod ticket;
