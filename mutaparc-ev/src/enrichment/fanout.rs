//! Settle-all fan-out over labeled source queries
//!
//! Every evaluator and orchestrator fans out the same way: all sub-queries
//! start within the same tick, all are awaited as a set, and a slow or
//! failing member never blocks or cancels its siblings. The outcome is a
//! structured `{succeeded, failed}` partition with per-source attribution.

use crate::sources::SourceError;
use futures::future::{join_all, BoxFuture};
use tracing::warn;

/// One labeled sub-query: a stable key for downstream lookup plus the name
/// of the upstream provider it hits.
pub struct SubQuery<'a, T> {
    pub key: &'static str,
    pub source: &'static str,
    pub fut: BoxFuture<'a, Result<T, SourceError>>,
}

impl<'a, T> SubQuery<'a, T> {
    pub fn new(
        key: &'static str,
        source: &'static str,
        fut: BoxFuture<'a, Result<T, SourceError>>,
    ) -> Self {
        Self { key, source, fut }
    }
}

/// Successful sub-query outcome
#[derive(Debug, Clone)]
pub struct SubResult<T> {
    pub key: &'static str,
    pub source: &'static str,
    pub value: T,
}

/// Failed sub-query outcome (recorded, never raised)
#[derive(Debug, Clone)]
pub struct SubFailure {
    pub key: &'static str,
    pub source: &'static str,
    pub error: SourceError,
}

/// Partition of one fan-out round
#[derive(Debug, Clone)]
pub struct Settled<T> {
    pub succeeded: Vec<SubResult<T>>,
    pub failed: Vec<SubFailure>,
}

impl<T> Settled<T> {
    /// Value of the sub-query with the given key, when it succeeded
    pub fn value(&self, key: &str) -> Option<&T> {
        self.succeeded.iter().find(|r| r.key == key).map(|r| &r.value)
    }

    pub fn failed_key(&self, key: &str) -> bool {
        self.failed.iter().any(|f| f.key == key)
    }

    /// Provider names that answered, deduplicated, first-seen order
    pub fn sources_utilisees(&self) -> Vec<String> {
        dedup_sources(self.succeeded.iter().map(|r| r.source))
    }

    /// Provider names that failed, deduplicated, first-seen order
    pub fn sources_echouees(&self) -> Vec<String> {
        dedup_sources(self.failed.iter().map(|f| f.source))
    }

    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty()
    }
}

/// Merge provider names preserving first-seen order
pub fn dedup_sources<'s>(names: impl Iterator<Item = &'s str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.iter().any(|existing| existing == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// Run every sub-query concurrently and partition the outcomes.
///
/// Failures are logged and recorded; they do not abort the round.
pub async fn settle_all<T>(queries: Vec<SubQuery<'_, T>>) -> Settled<T> {
    let futures = queries.into_iter().map(|q| async move {
        let started = std::time::Instant::now();
        match q.fut.await {
            Ok(value) => {
                tracing::debug!(
                    key = q.key,
                    source = q.source,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Source query answered"
                );
                Ok(SubResult {
                    key: q.key,
                    source: q.source,
                    value,
                })
            }
            Err(error) => {
                warn!(
                    key = q.key,
                    source = q.source,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %error,
                    "Source query failed"
                );
                Err(SubFailure {
                    key: q.key,
                    source: q.source,
                    error,
                })
            }
        }
    });

    let mut settled = Settled {
        succeeded: Vec::new(),
        failed: Vec::new(),
    };
    for outcome in join_all(futures).await {
        match outcome {
            Ok(r) => settled.succeeded.push(r),
            Err(f) => settled.failed.push(f),
        }
    }
    settled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(key: &'static str, source: &'static str, value: u32) -> SubQuery<'static, u32> {
        SubQuery::new(key, source, Box::pin(async move { Ok(value) }))
    }

    fn ko(key: &'static str, source: &'static str) -> SubQuery<'static, u32> {
        SubQuery::new(
            key,
            source,
            Box::pin(async move { Err(SourceError::Api("down".to_string())) }),
        )
    }

    #[tokio::test]
    async fn partitions_successes_and_failures() {
        let settled = settle_all(vec![
            ok("a", "Provider A", 1),
            ko("b", "Provider B"),
            ok("c", "Provider A", 3),
        ])
        .await;

        assert_eq!(settled.succeeded.len(), 2);
        assert_eq!(settled.failed.len(), 1);
        assert_eq!(settled.value("a"), Some(&1));
        assert_eq!(settled.value("b"), None);
        assert!(settled.failed_key("b"));
    }

    #[tokio::test]
    async fn same_provider_dedups_to_one_source_entry() {
        let settled = settle_all(vec![
            ok("natura2000", "API Carto Nature", 1),
            ok("znieff1", "API Carto Nature", 0),
            ko("rnn", "API Carto Nature"),
        ])
        .await;

        assert_eq!(settled.sources_utilisees(), vec!["API Carto Nature"]);
        assert_eq!(settled.sources_echouees(), vec!["API Carto Nature"]);
    }

    #[tokio::test]
    async fn all_failed_round() {
        let settled = settle_all(vec![ko("x", "P1"), ko("y", "P2")]).await;
        assert!(settled.all_failed());
        assert_eq!(settled.sources_echouees(), vec!["P1", "P2"]);
    }

    #[tokio::test]
    async fn empty_round_counts_as_all_failed() {
        let settled: Settled<u32> = settle_all(vec![]).await;
        assert!(settled.all_failed());
        assert!(settled.sources_utilisees().is_empty());
    }
}
