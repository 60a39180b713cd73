pub mod asset;
pub mod clock;
pub mod file_storage;
#[cfg(test)]
pub mod memory;
