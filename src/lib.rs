pub mod captions;
pub mod common;
pub mod ui;
