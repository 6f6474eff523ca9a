//! HTTP Handlers

mod books;
mod export;
mod health;

pub use books::*;
pub use export::*;
pub use health::*;
