// Module exports for models

pub mod calendar_date;
pub mod restrictions;
pub mod selection;
pub mod settings;
