//! HTML handlers for the home page and short link redirects.

mod home;

pub use home::{HomeTemplate, create_handler, home_handler, redirect_handler};
