// Timeline engine library
// Time geometry, lane layout, snapping and gesture handling for day views

pub mod interaction;
pub mod models;
pub mod services;
pub mod timeline;
pub mod utils;
