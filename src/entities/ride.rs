use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::RouteQuote;
use crate::error::{invalid_transition_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// The reservation binding one rider and one taxi for one trip.
///
/// `status` is the only field mutated after creation, except the atomic
/// route/price replacement permitted while `Pending`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ride {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub taxi_id: Uuid,
    pub route: RouteQuote,
    pub origin_label: String,
    pub destination_label: String,
    pub price: f64,
    pub status: Status,
    pub requested_at: DateTime<Utc>,
}

impl Ride {
    pub fn new(
        rider_id: Uuid,
        taxi_id: Uuid,
        route: RouteQuote,
        origin_label: String,
        destination_label: String,
        price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            rider_id,
            taxi_id,
            route,
            origin_label,
            destination_label,
            price,
            status: Status::Pending,
            requested_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        match self.status {
            Status::Pending => true,
            _ => false,
        }
    }

    /// Driver accepted: `Pending -> Confirmed`.
    pub fn accept(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                self.status = Status::Confirmed;
                Ok(())
            }
            _ => Err(invalid_transition_error()),
        }
    }

    /// Driver rejected before acceptance: `Pending -> Cancelled`.
    pub fn reject(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                self.status = Status::Cancelled;
                Ok(())
            }
            _ => Err(invalid_transition_error()),
        }
    }

    /// Driver marked the trip finished: `Confirmed -> Completed`.
    pub fn complete(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Confirmed => {
                self.status = Status::Completed;
                Ok(())
            }
            _ => Err(invalid_transition_error()),
        }
    }

    /// Either party cancelled: valid from `Pending` or `Confirmed`. Returns
    /// whether a taxi had already been assigned and must be freed.
    pub fn cancel(&mut self) -> Result<bool, Error> {
        match self.status {
            Status::Pending => {
                self.status = Status::Cancelled;
                Ok(false)
            }
            Status::Confirmed => {
                self.status = Status::Cancelled;
                Ok(true)
            }
            _ => Err(invalid_transition_error()),
        }
    }

    /// Replace route, labels and price in one step. Only permitted while
    /// `Pending`; the ride keeps its id.
    pub fn replace_route(
        &mut self,
        route: RouteQuote,
        origin_label: String,
        destination_label: String,
        price: f64,
    ) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                self.route = route;
                self.origin_label = origin_label;
                self.destination_label = destination_label;
                self.price = price;
                Ok(())
            }
            _ => Err(invalid_transition_error()),
        }
    }
}
