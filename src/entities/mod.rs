mod coordinate;
mod quote;
mod ride;
mod taxi;

pub use coordinate::Coordinate;
pub use quote::{QuoteSource, RouteQuote};
pub use ride::{Ride, Status as RideStatus};
pub use taxi::{Availability, Candidate, TaxiSnapshot, Vehicle};
