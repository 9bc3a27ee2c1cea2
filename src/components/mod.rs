pub mod panel;
pub mod ticker;
