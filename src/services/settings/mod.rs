//! Loading and saving engine settings.

mod service;

pub use service::SettingsService;
