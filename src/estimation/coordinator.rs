//! Latest-wins batch runner
//!
//! Only the most recent batch is allowed to finish. Starting a new one aborts
//! whatever is still in flight, and that earlier caller gets
//! [`EstimationError::Superseded`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::AbortHandle;

use super::{
    estimate_recipe_added_sugars, AddedSugarsEstimate, EstimationError, EstimationResult,
    SugarEstimator,
};
use crate::nutrition::IngredientLine;

pub struct EstimationCoordinator {
    estimator: Arc<dyn SugarEstimator>,
    generation: AtomicU64,
    in_flight: Mutex<Option<(u64, AbortHandle)>>,
}

impl EstimationCoordinator {
    pub fn new(estimator: Arc<dyn SugarEstimator>) -> Self {
        Self {
            estimator,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    /// Estimate added sugars for a recipe, cancelling any earlier batch
    pub async fn estimate(&self, lines: Vec<IngredientLine>) -> EstimationResult<AddedSugarsEstimate> {
        let estimator = Arc::clone(&self.estimator);
        let task = tokio::spawn(async move {
            estimate_recipe_added_sugars(&lines, estimator.as_ref()).await
        });

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut slot = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            if let Some((previous, handle)) = slot.replace((generation, task.abort_handle())) {
                tracing::debug!("Superseding estimation batch {}", previous);
                handle.abort();
            }
        }

        // Dropping this future mid-batch must not leave the task running
        let _guard = InFlightGuard {
            coordinator: self,
            generation,
        };

        match task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(EstimationError::Superseded),
            Err(e) => Err(EstimationError::Task(e.to_string())),
        }
    }

    /// Whether a batch is currently running
    pub fn is_busy(&self) -> bool {
        self.in_flight
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    fn release(&self, generation: u64) {
        let mut slot = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if matches!(slot.as_ref(), Some((current, _)) if *current == generation) {
            if let Some((_, handle)) = slot.take() {
                handle.abort();
            }
        }
    }
}

/// Clears the in-flight slot for its batch, whether the caller finished or gave up
struct InFlightGuard<'a> {
    coordinator: &'a EstimationCoordinator,
    generation: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.release(self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::test_support::FixedEstimator;
    use crate::nutrition::NutrientProfile;
    use std::time::Duration;

    fn lines(quantity_g: f64) -> Vec<IngredientLine> {
        vec![IngredientLine::new("Farinha de trigo", quantity_g, NutrientProfile::default())]
    }

    #[tokio::test]
    async fn test_single_batch_completes() {
        let coordinator = EstimationCoordinator::new(Arc::new(FixedEstimator::new(0.05)));
        let out = coordinator.estimate(lines(100.0)).await.unwrap();
        assert_eq!(out.total_g, 5.0);
        assert!(!coordinator.is_busy());
    }

    #[tokio::test]
    async fn test_newer_batch_supersedes_older() {
        let estimator = Arc::new(FixedEstimator::slow(0.1, Duration::from_millis(300)));
        let coordinator = Arc::new(EstimationCoordinator::new(estimator));

        let first = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.estimate(lines(100.0)).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(coordinator.is_busy());

        let second = coordinator.estimate(lines(200.0)).await.unwrap();
        assert_eq!(second.total_g, 20.0);

        let first = first.await.unwrap();
        assert!(matches!(first, Err(EstimationError::Superseded)));
        assert!(!coordinator.is_busy());
    }

    #[tokio::test]
    async fn test_dropped_caller_releases_batch() {
        let estimator = Arc::new(FixedEstimator::slow(0.1, Duration::from_millis(200)));
        let coordinator = Arc::new(EstimationCoordinator::new(estimator.clone()));

        let caller = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator
                    .estimate(vec![
                        IngredientLine::new("Farinha de trigo", 100.0, NutrientProfile::default()),
                        IngredientLine::new("Fubá", 100.0, NutrientProfile::default()),
                    ])
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(coordinator.is_busy());

        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());
        assert!(!coordinator.is_busy());

        // The batch was aborted with its caller, so the second ingredient is never estimated
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(estimator.calls(), 1);
    }
}
