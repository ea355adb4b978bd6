pub mod status;
pub mod version;
