// Settings service module
// Loads picker configuration from TOML files

mod service;

pub use service::{PickerSettings, SettingsService};
