pub mod book;
pub mod config;
pub mod error;
pub mod http;

pub use book::{ItemRecord, SearchEvent, SearchTerm};
pub use config::{AppConfig, CarouselConfig};
pub use error::{Error, Result};
