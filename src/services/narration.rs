//! Narration interface

use crate::narrative::NarrativeRequest;
use crate::services::errors::NarrationError;
use async_trait::async_trait;

#[async_trait]
pub trait Narrator {
    /// Natural-language analysis for the request. When the request carries an image the
    /// implementation may pass it to a vision-capable model.
    async fn narrate(&self, request: &NarrativeRequest) -> Result<String, NarrationError>;
}
