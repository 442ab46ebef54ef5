use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::{QuoteAPI, RideAPI},
    entities::{Availability, Coordinate, Ride, RouteQuote},
    error::{candidate_unavailable_error, invalid_input_error, invalid_transition_error, Error},
    notify::Notification,
};

impl Engine {
    /// Taxi status changes that ride after a committed transition; a failure
    /// here is logged, not propagated, since the transition already holds.
    async fn release_taxi(&self, taxi_id: Uuid, status: Availability) {
        if let Err(err) = self.store.set_status(taxi_id, status, Utc::now()).await {
            tracing::warn!(code = err.code, %taxi_id, "failed to update taxi status");
        }
    }
}

#[async_trait]
impl RideAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn request_ride(
        &self,
        rider_id: Uuid,
        taxi_id: Uuid,
        quote: RouteQuote,
    ) -> Result<Ride, Error> {
        if quote.distance_km < 0.0 {
            return Err(invalid_input_error());
        }

        // the candidate list may be stale by the time the rider confirms
        let taxi = self.store.find_taxi(taxi_id).await?;

        if !taxi.is_disponible() {
            return Err(candidate_unavailable_error());
        }

        let (origin_label, destination_label) = futures::join!(
            self.label_for(quote.origin),
            self.label_for(quote.destination)
        );

        let price = self.price_for(quote.distance_km);
        let ride = Ride::new(
            rider_id,
            taxi_id,
            quote,
            origin_label,
            destination_label,
            price,
        );

        self.store.insert_ride(&ride).await?;

        // a ride is never announced before it exists
        self.dispatch(Notification::new(
            rider_id,
            "Reservation pending",
            format!(
                "Your request to {} was sent to {}.",
                ride.destination_label, taxi.driver_name
            ),
        ))
        .await;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn find_ride(&self, id: Uuid) -> Result<Ride, Error> {
        self.store.find_ride(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn respond_to_ride(&self, id: Uuid, accept: bool) -> Result<Ride, Error> {
        let lock = self.ride_lock(id).await;
        let _guard = lock.lock().await;

        let mut ride = self.store.find_ride(id).await?;

        let notification = if accept {
            ride.accept()?;

            Notification::new(
                ride.rider_id,
                "Reservation confirmed",
                "The driver accepted your request and is on the way.",
            )
        } else {
            ride.reject()?;

            Notification::new(
                ride.rider_id,
                "Reservation cancelled",
                "The driver declined your request. Pick another taxi.",
            )
        };

        self.store.update_ride(&ride).await?;

        if accept {
            // the assigned taxi stops being offered to other riders
            self.release_taxi(ride.taxi_id, Availability::Indisponible)
                .await;
        }

        self.dispatch(notification).await;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn complete_ride(&self, id: Uuid) -> Result<Ride, Error> {
        let lock = self.ride_lock(id).await;
        let _guard = lock.lock().await;

        let mut ride = self.store.find_ride(id).await?;
        ride.complete()?;

        self.store.update_ride(&ride).await?;
        self.release_taxi(ride.taxi_id, Availability::Disponible)
            .await;

        self.dispatch(Notification::new(
            ride.rider_id,
            "Trip completed",
            format!("You arrived at {}.", ride.destination_label),
        ))
        .await;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_ride(&self, id: Uuid) -> Result<Ride, Error> {
        let lock = self.ride_lock(id).await;
        let _guard = lock.lock().await;

        let mut ride = self.store.find_ride(id).await?;
        let had_assignment = ride.cancel()?;

        self.store.update_ride(&ride).await?;

        if had_assignment {
            self.release_taxi(ride.taxi_id, Availability::Disponible)
                .await;
        }

        self.dispatch(Notification::new(
            ride.rider_id,
            "Reservation cancelled",
            "Your reservation was cancelled.",
        ))
        .await;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn edit_route(
        &self,
        id: Uuid,
        new_origin: Option<Coordinate>,
        new_destination: Option<Coordinate>,
    ) -> Result<Ride, Error> {
        let lock = self.ride_lock(id).await;
        let _guard = lock.lock().await;

        let mut ride = self.store.find_ride(id).await?;

        if !ride.is_pending() {
            return Err(invalid_transition_error());
        }

        let origin = new_origin.unwrap_or(ride.route.origin);
        let destination = new_destination.unwrap_or(ride.route.destination);

        let quote = self.quote_route(origin, destination).await?;
        let (origin_label, destination_label) =
            futures::join!(self.label_for(origin), self.label_for(destination));

        // quote and price replace together or not at all
        let price = self.price_for(quote.distance_km);
        ride.replace_route(quote, origin_label, destination_label, price)?;

        self.store.update_ride(&ride).await?;

        Ok(ride)
    }
}
