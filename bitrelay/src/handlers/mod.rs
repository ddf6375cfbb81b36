pub mod info;
pub mod line;
pub mod order;
pub mod ticker;
