// Service module exports

pub mod calendar;
pub mod date_picker;
pub mod focus;
pub mod persistence;
pub mod settings;
