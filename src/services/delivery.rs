//! Delivery interface

use crate::models::Delivery;
use crate::services::errors::DeliveryError;
use async_trait::async_trait;

#[async_trait]
pub trait Deliverer {
    /// Send the text (and the image, when given) to the destination with its formatting intact
    async fn deliver(&self, delivery: &Delivery) -> Result<(), DeliveryError>;
}
