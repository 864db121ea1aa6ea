#![forbid(unsafe_code)]

pub mod model;
pub mod nav;
pub mod shell;
pub mod time;

pub use time::Clock;
