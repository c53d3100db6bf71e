// Cancellation and deadlines for a running listing

use std::time::Duration;

use tokio::time::Instant;
pub use tokio_util::sync::CancellationToken;

use crate::{config::CatalogConfig, error::CatalogError};

#[derive(Debug, Clone, Default)]
pub struct ListControl {
    pub token: CancellationToken,
    pub deadline: Option<Instant>,
    pub row_timeout: Option<Duration>,
}

impl ListControl {
    pub fn new() -> Self {
        Self::default()
    }

    // Deadline counts from the moment this is called
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: config
                .deadline_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
            row_timeout: config.row_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_row_timeout(mut self, timeout: Duration) -> Self {
        self.row_timeout = Some(timeout);
        self
    }

    // Fails when the listing must stop before the next row.
    pub fn check(&self) -> Result<(), CatalogError> {
        if self.token.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(CatalogError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    // Time a single row may take: the row timeout, capped by what is left
    // before the deadline. The flag tells whether the deadline is the bound.
    pub(crate) fn row_budget(&self) -> Option<(Duration, bool)> {
        let remaining = self
            .deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()));

        match (self.row_timeout, remaining) {
            (None, None) => None,
            (Some(row), None) => Some((row, false)),
            (None, Some(left)) => Some((left, true)),
            (Some(row), Some(left)) if left < row => Some((left, true)),
            (Some(row), Some(_)) => Some((row, false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let control = ListControl::new().with_token(token.clone());
        assert!(control.check().is_ok());

        token.cancel();
        assert!(matches!(control.check(), Err(CatalogError::Cancelled)));
    }

    #[tokio::test]
    async fn test_deadline() {
        let control = ListControl::new().with_deadline(Instant::now());
        assert!(matches!(control.check(), Err(CatalogError::DeadlineExceeded)));

        let control = ListControl::new().with_deadline(Instant::now() + Duration::from_secs(60));
        assert!(control.check().is_ok());
    }

    #[tokio::test]
    async fn test_row_budget() {
        assert_eq!(ListControl::new().row_budget(), None);

        let control = ListControl::new().with_row_timeout(Duration::from_millis(50));
        assert_eq!(control.row_budget(), Some((Duration::from_millis(50), false)));

        let control = ListControl::new()
            .with_row_timeout(Duration::from_secs(60))
            .with_deadline(Instant::now() + Duration::from_millis(100));
        let (budget, from_deadline) = control.row_budget().unwrap();
        assert!(from_deadline);
        assert!(budget <= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = CatalogConfig {
            deadline_ms: Some(1_000),
            row_timeout_ms: Some(10),
            ..Default::default()
        };
        let control = ListControl::from_config(&config);
        assert!(control.deadline.is_some());
        assert_eq!(control.row_timeout, Some(Duration::from_millis(10)));
        assert!(control.check().is_ok());
    }
}
