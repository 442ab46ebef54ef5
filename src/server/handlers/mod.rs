pub mod quotes;
pub mod rides;
pub mod taxis;
