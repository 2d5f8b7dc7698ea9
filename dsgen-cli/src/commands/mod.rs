pub mod common;
pub mod generate;
pub mod info;
pub mod provider;
pub mod refs;
pub mod signature;
