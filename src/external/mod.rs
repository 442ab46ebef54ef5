pub mod geocoding;
pub mod push;
pub mod routing;
