mod date_picker;
mod focus;
mod palette;

pub use date_picker::date_picker;
pub use focus::{target_id, EguiFocus};
