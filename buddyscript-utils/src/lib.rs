pub mod datetime;
pub mod files;
pub mod id;
pub mod passwords;
