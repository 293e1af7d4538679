pub mod category;
pub mod draft;
pub mod event;
pub mod file_formats;
pub mod geo;
pub mod marker;
pub mod parameter;
