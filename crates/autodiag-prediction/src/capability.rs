//! The external inference capability seam.

use std::sync::Arc;

use async_trait::async_trait;
use autodiag_errors::PredictionError;

use crate::credential::ApiKey;
use crate::request::InferenceRequest;

/// Something that turns a prompt plus response constraint into structured text.
///
/// Implementations report unreachable, overloaded or rejecting services as
/// [`PredictionError::Transport`] and undecodable envelopes as
/// [`PredictionError::SchemaValidation`]. The returned text is decoded by the
/// orchestrator, not the capability.
#[async_trait]
pub trait InferenceCapability: Send + Sync {
    /// Make exactly one call.
    async fn generate(
        &self,
        key: &ApiKey,
        request: &InferenceRequest,
    ) -> Result<String, PredictionError>;
}

#[async_trait]
impl<T: InferenceCapability + ?Sized> InferenceCapability for Arc<T> {
    async fn generate(
        &self,
        key: &ApiKey,
        request: &InferenceRequest,
    ) -> Result<String, PredictionError> {
        (**self).generate(key, request).await
    }
}
