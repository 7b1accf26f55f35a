pub mod core;
pub mod error;
pub mod fs_paths;
pub mod models;
pub mod session;
pub mod storage;

pub use error::{Error, Result, TransferFailure};
