//! Terminal front end of the quiz client.

mod client;
mod ui;

pub use client::run;
