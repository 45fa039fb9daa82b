//! Device position lookup, bounded by a fixed deadline.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;

use crate::model::Coordinates;

/// Deadline for a single position request.
pub const LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Location service errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Location access denied. Please enable location permissions and try again.")]
    PermissionDenied,
    #[error("Location information is unavailable. Please try again.")]
    PositionUnavailable,
    #[error("Location request timed out. Please try again.")]
    Timeout,
    #[error("Unable to get your location: {0}")]
    Other(String),
}

/// Options passed to a single-shot position request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Age of a cached fix the source may return; zero means never reuse one.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: LOCATE_TIMEOUT,
            maximum_age: Duration::ZERO,
        }
    }
}

#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError>;
}

/// Request one fresh position. A source that has not answered within
/// [`LOCATE_TIMEOUT`] yields [`GeolocationError::Timeout`].
pub async fn locate(source: &dyn PositionSource) -> Result<Coordinates, GeolocationError> {
    let options = PositionOptions::default();

    match tokio::time::timeout(options.timeout, source.current_position(&options)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("position request exceeded {:?}", options.timeout);
            Err(GeolocationError::Timeout)
        }
    }
}

/// A fixed position, e.g. a configured home location.
#[derive(Debug, Clone, Copy)]
pub struct StaticPosition(pub Coordinates);

#[async_trait]
impl PositionSource for StaticPosition {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NeverAnswers;

    #[async_trait]
    impl PositionSource for NeverAnswers {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinates, GeolocationError> {
            std::future::pending().await
        }
    }

    #[derive(Debug)]
    struct Denied;

    #[async_trait]
    impl PositionSource for Denied {
        async fn current_position(
            &self,
            options: &PositionOptions,
        ) -> Result<Coordinates, GeolocationError> {
            assert!(options.high_accuracy);
            assert_eq!(options.maximum_age, Duration::ZERO);
            Err(GeolocationError::PermissionDenied)
        }
    }

    #[tokio::test]
    async fn static_position_answers_immediately() {
        let at = Coordinates::new(47.6062, -122.3321);
        assert_eq!(locate(&StaticPosition(at)).await, Ok(at));
    }

    #[tokio::test(start_paused = true)]
    async fn silent_source_times_out_after_ten_seconds() {
        let started = tokio::time::Instant::now();

        let result = locate(&NeverAnswers).await;

        assert_eq!(result, Err(GeolocationError::Timeout));
        assert!(started.elapsed() >= LOCATE_TIMEOUT);
    }

    #[tokio::test]
    async fn source_errors_pass_through() {
        let err = locate(&Denied).await.unwrap_err();
        assert_eq!(err, GeolocationError::PermissionDenied);
        assert!(err.to_string().starts_with("Location access denied"));
    }

    #[test]
    fn each_category_has_its_own_message() {
        let messages = [
            GeolocationError::PermissionDenied.to_string(),
            GeolocationError::PositionUnavailable.to_string(),
            GeolocationError::Timeout.to_string(),
            GeolocationError::Other("boom".into()).to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
