pub mod client;
pub mod convert;
pub mod error;
pub mod models;
mod trait_impl;


pub use client::RestClient;
pub use error::{RestError, Result};
pub use models::*;

pub use useradmin_core::{AdminError, UserDirectory};
