//! HTTP request handlers.

pub mod coach;
pub mod common;
pub mod demos;
pub mod media;
pub mod uploads;

pub use coach::*;
pub use common::*;
pub use demos::*;
pub use media::*;
pub use uploads::*;
