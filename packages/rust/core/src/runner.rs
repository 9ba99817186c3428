//! The concurrency coordinator: bounded parallel transforms, one outcome
//! per discovered document.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, instrument};

use quarry_shared::{QuarryError, Result};

use crate::pipeline::TransformPipeline;

// ---------------------------------------------------------------------------
// Outcomes & report
// ---------------------------------------------------------------------------

/// Per-document pipeline result, tagged with the source path.
#[derive(Debug)]
pub struct DocumentOutcome {
    /// The note this outcome belongs to.
    pub path: PathBuf,
    /// Formatted module text, or the document-scoped failure.
    pub result: Result<String>,
}

/// The aggregated report for one run: exactly one outcome per discovered
/// document, in completion order (no ordering guarantee).
#[derive(Debug, Default)]
pub struct RunReport {
    /// All per-document outcomes.
    pub outcomes: Vec<DocumentOutcome>,
}

impl RunReport {
    /// Successful outcomes.
    pub fn successes(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    /// Failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// Number of failed outcomes.
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// The run succeeds only when every outcome succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Callback for reporting per-document completion.
pub trait ProgressReporter: Send + Sync {
    /// Called as each document's outcome lands, in completion order.
    fn document_done(&self, outcome: &DocumentOutcome, done: usize, total: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn document_done(&self, _outcome: &DocumentOutcome, _done: usize, _total: usize) {}
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Apply `transform` to every path with at most `limit` invocations in
/// flight, aggregating one outcome per path.
///
/// Failure isolation: a failing document never cancels or affects any
/// other in-flight document, and a transform that panics is recorded as
/// that document's failed outcome. The report is complete: the run ends
/// only once every path has produced its outcome.
#[instrument(skip_all, fields(total = paths.len(), limit))]
pub async fn run_batch<F, Fut>(
    paths: Vec<PathBuf>,
    limit: usize,
    transform: F,
    progress: &dyn ProgressReporter,
) -> RunReport
where
    F: Fn(PathBuf) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    let total = paths.len();
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let transform = Arc::new(transform);
    let mut tasks = JoinSet::new();
    // Task id → path, so a panicked task's document is not lost.
    let mut in_flight: HashMap<tokio::task::Id, PathBuf> = HashMap::new();

    info!(total, limit, "starting batch run");

    for path in paths {
        let semaphore = Arc::clone(&semaphore);
        let transform = Arc::clone(&transform);
        let task_path = path.clone();

        let handle = tasks.spawn(async move {
            // The transform only runs under a permit, so at most `limit`
            // invocations are unresolved at any instant.
            let _permit = semaphore.acquire_owned().await.expect("semaphore open");
            let result = transform(path.clone()).await;
            DocumentOutcome { path, result }
        });
        in_flight.insert(handle.id(), task_path);
    }

    let mut report = RunReport {
        outcomes: Vec::with_capacity(total),
    };

    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((id, outcome)) => {
                in_flight.remove(&id);
                progress.document_done(&outcome, report.outcomes.len() + 1, total);
                report.outcomes.push(outcome);
            }
            // A panicked transform still owes its document an outcome.
            Err(e) => {
                error!(error = %e, "transform task aborted");
                if let Some(path) = in_flight.remove(&e.id()) {
                    let outcome = DocumentOutcome {
                        path,
                        result: Err(QuarryError::task(format!("transform aborted: {e}"))),
                    };
                    progress.document_done(&outcome, report.outcomes.len() + 1, total);
                    report.outcomes.push(outcome);
                }
            }
        }
    }

    info!(
        total,
        failures = report.failure_count(),
        "batch run complete"
    );

    report
}

/// Run the real [`TransformPipeline`] over a batch of discovered paths.
pub async fn run_pipeline(
    paths: Vec<PathBuf>,
    pipeline: TransformPipeline,
    limit: usize,
    progress: &dyn ProgressReporter,
) -> RunReport {
    let pipeline = Arc::new(pipeline);
    run_batch(
        paths,
        limit,
        move |path| {
            let pipeline = Arc::clone(&pipeline);
            async move { pipeline.transform(&path).await }
        },
        progress,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use quarry_shared::{ComponentConfig, QuarryError};
    use quarry_vault::PermalinkIndex;

    fn fake_paths(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("note-{i}.md"))).collect()
    }

    #[tokio::test]
    async fn exactly_one_outcome_per_document() {
        let paths = fake_paths(25);
        let report = run_batch(
            paths.clone(),
            10,
            |path| async move { Ok(path.display().to_string()) },
            &SilentProgress,
        )
        .await;

        assert_eq!(report.outcomes.len(), 25);
        let seen: HashSet<&PathBuf> = report.outcomes.iter().map(|o| &o.path).collect();
        assert_eq!(seen.len(), 25, "no duplicates, no omissions");
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn concurrency_bound_is_respected() {
        let active = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let transform = {
            let active = Arc::clone(&active);
            let max_seen = Arc::clone(&max_seen);
            move |_path: PathBuf| {
                let active = Arc::clone(&active);
                let max_seen = Arc::clone(&max_seen);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    Ok(String::new())
                }
            }
        };

        let report = run_batch(fake_paths(25), 10, transform, &SilentProgress).await;

        assert_eq!(report.outcomes.len(), 25);
        assert!(
            max_seen.load(Ordering::SeqCst) <= 10,
            "saw {} concurrent invocations",
            max_seen.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn one_failure_does_not_affect_others() {
        let dir = tempfile::tempdir().unwrap();
        let good = |name: &str| {
            let path = dir.path().join(name);
            fs::write(&path, "## Fine\n\ncontent\n").unwrap();
            path
        };
        let a = good("a.md");
        let b = good("b.md");
        let missing = dir.path().join("missing.md");

        let index = Arc::new(PermalinkIndex::build(dir.path(), &[a.clone(), b.clone()]));
        let pipeline = TransformPipeline::new(index, ComponentConfig::default());

        let report = run_pipeline(
            vec![a, missing.clone(), b],
            pipeline,
            10,
            &SilentProgress,
        )
        .await;

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.failure_count(), 1);
        assert!(!report.is_success());

        let failure = report.failures().next().unwrap();
        assert_eq!(failure.path, missing);
        assert!(matches!(
            failure.result.as_ref().unwrap_err(),
            QuarryError::Read { .. }
        ));
    }

    #[tokio::test]
    async fn panicking_transform_yields_failed_outcome() {
        let paths = fake_paths(3);
        let report = run_batch(
            paths.clone(),
            10,
            |path: PathBuf| async move {
                if path.ends_with("note-1.md") {
                    panic!("transform blew up");
                }
                Ok(String::new())
            },
            &SilentProgress,
        )
        .await;

        assert_eq!(report.outcomes.len(), 3, "outcome silently dropped");
        assert_eq!(report.failure_count(), 1);
        assert!(!report.is_success());

        let failure = report.failures().next().unwrap();
        assert_eq!(failure.path, PathBuf::from("note-1.md"));
        assert!(matches!(
            failure.result.as_ref().unwrap_err(),
            QuarryError::Task { .. }
        ));
    }

    #[tokio::test]
    async fn progress_sees_every_outcome() {
        struct Counting(AtomicUsize);
        impl ProgressReporter for Counting {
            fn document_done(&self, _: &DocumentOutcome, _: usize, _: usize) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let progress = Counting(AtomicUsize::new(0));
        run_batch(
            fake_paths(7),
            3,
            |_| async { Ok(String::new()) },
            &progress,
        )
        .await;
        assert_eq!(progress.0.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn empty_batch_produces_empty_successful_report() {
        let report = run_batch(
            Vec::new(),
            10,
            |_| async { Ok(String::new()) },
            &SilentProgress,
        )
        .await;
        assert!(report.outcomes.is_empty());
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn zero_limit_is_clamped_not_deadlocked() {
        let report = run_batch(
            fake_paths(2),
            0,
            |_| async { Ok(String::new()) },
            &SilentProgress,
        )
        .await;
        assert_eq!(report.outcomes.len(), 2);
    }
}
