// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Batch naming orchestration
//!
//! Owns the per-batch state: for each discovered file, ask the suggestion
//! provider, fall back to the deterministic heuristic on any failure, and
//! pipe the composed name through collision resolution before it becomes a
//! rename plan. Files in one directory are planned strictly sequentially
//! because each resolved name changes what counts as existing for the next.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::claude::SuggestionProvider;
use crate::extract::PreviewExtractor;
use crate::history::{History, HistoryEntry};
use crate::naming::collision::CollisionResolver;
use crate::naming::fallback;
use crate::scanner::{self, FileRecord};
use crate::Result;

/// A finalized, collision-free rename decision for one file. The only
/// type that crosses into the confirmation/execution surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub source_path: PathBuf,
    pub new_name: String,
    pub reason: String,
}

/// Per-file outcome counters for an executed batch. There is no rollback:
/// a failure leaves the remaining files untouched and counted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub renamed: usize,
    pub failed: usize,
}

/// Drives naming decisions for batches of files.
pub struct NamingOrchestrator {
    provider: Arc<dyn SuggestionProvider>,
    extractor: Arc<dyn PreviewExtractor>,
    skip_names: Vec<String>,
}

impl NamingOrchestrator {
    pub fn new(
        provider: Arc<dyn SuggestionProvider>,
        extractor: Arc<dyn PreviewExtractor>,
        skip_names: Vec<String>,
    ) -> Self {
        Self {
            provider,
            extractor,
            skip_names,
        }
    }

    /// Scan a directory and produce a full batch of rename plans.
    pub async fn plan_directory(&self, dir: &Path) -> Result<Vec<RenamePlan>> {
        let records = scanner::scan_directory(dir, self.extractor.as_ref(), &self.skip_names)?;
        info!("Found {} files to process in {:?}", records.len(), dir);
        Ok(self.plan(dir, &records).await)
    }

    /// Decide names for every record, in order.
    ///
    /// Within the batch, resolved names are pairwise distinct and collide
    /// with no other pre-existing directory entry; a file keeping its own
    /// current name is allowed.
    pub async fn plan(&self, dir: &Path, records: &[FileRecord]) -> Vec<RenamePlan> {
        let mut resolver = CollisionResolver::new(dir);
        let mut plans = Vec::with_capacity(records.len());

        for record in records {
            info!("Analyzing: {}", record.filename);

            let suggestion = match self.provider.suggest(record).await {
                Ok(s) => s,
                Err(e) => {
                    warn!(
                        "Suggestion failed for {}, using fallback: {}",
                        record.filename, e
                    );
                    fallback::suggest(&record.filename, &record.extension)
                }
            };

            let proposed = suggestion.compose(&record.extension);
            let own_path = dir.join(&record.filename);
            let resolution = resolver.resolve(&proposed, &own_path);

            let mut reason = suggestion.reason;
            if let Some(suffix) = &resolution.suffix {
                reason.push_str(&format!(
                    " (Unique identifier {} added to prevent naming collision)",
                    suffix
                ));
            }

            info!("Suggestion: {} -> {}", record.filename, resolution.name);

            plans.push(RenamePlan {
                source_path: record.source_path.clone(),
                new_name: resolution.name,
                reason,
            });
        }

        plans
    }

    /// Execute a batch of plans, renaming one file at a time.
    ///
    /// Each target is re-checked immediately before its rename; a target
    /// that appeared in the meantime is a per-file failure, not a batch
    /// abort. Executed renames are appended to the history journal.
    pub fn execute(plans: &[RenamePlan], history: &History, dry_run: bool) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for plan in plans {
            let parent = match plan.source_path.parent() {
                Some(p) => p.to_path_buf(),
                None => {
                    warn!("Cannot determine parent directory for {:?}", plan.source_path);
                    outcome.failed += 1;
                    continue;
                }
            };
            let target = parent.join(&plan.new_name);

            if dry_run {
                info!("DRY RUN: Would rename {:?} to {}", plan.source_path, plan.new_name);
                outcome.renamed += 1;
                continue;
            }

            if target != plan.source_path && target.exists() {
                warn!("Target exists unexpectedly, skipping: {:?}", target);
                outcome.failed += 1;
                continue;
            }

            match std::fs::rename(&plan.source_path, &target) {
                Ok(()) => {
                    info!("Renamed: {:?} -> {}", plan.source_path, plan.new_name);
                    let entry = HistoryEntry::record(
                        plan.source_path.clone(),
                        target.clone(),
                        plan.reason.clone(),
                    );
                    if let Err(e) = history.append(&entry) {
                        warn!("Failed to record history entry: {}", e);
                    }
                    outcome.renamed += 1;
                }
                Err(e) => {
                    warn!("Error renaming {:?}: {}", plan.source_path, e);
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::NamingSuggestion;
    use crate::OnomastError;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    struct StubExtractor;

    impl PreviewExtractor for StubExtractor {
        fn extract(&self, _path: &Path) -> String {
            String::new()
        }
    }

    /// Provider that suggests the same name for every file.
    struct ConstantProvider;

    #[async_trait]
    impl SuggestionProvider for ConstantProvider {
        async fn suggest(&self, _record: &FileRecord) -> Result<NamingSuggestion> {
            Ok(NamingSuggestion {
                subject: "Team".to_string(),
                description: "Notes".to_string(),
                document_form: "MTG".to_string(),
                date: "20240101".to_string(),
                revision: "Rev0".to_string(),
                reason: "stub".to_string(),
            })
        }
    }

    /// Provider that always fails, forcing the fallback path.
    struct FailingProvider;

    #[async_trait]
    impl SuggestionProvider for FailingProvider {
        async fn suggest(&self, _record: &FileRecord) -> Result<NamingSuggestion> {
            Err(OnomastError::ClaudeUnavailable("offline".to_string()))
        }
    }

    fn orchestrator(provider: Arc<dyn SuggestionProvider>) -> NamingOrchestrator {
        NamingOrchestrator::new(provider, Arc::new(StubExtractor), Vec::new())
    }

    #[tokio::test]
    async fn test_batch_names_are_pairwise_distinct() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.docx"), b"x").unwrap();
        fs::write(dir.path().join("b.docx"), b"x").unwrap();
        fs::write(dir.path().join("c.docx"), b"x").unwrap();

        let orch = orchestrator(Arc::new(ConstantProvider));
        let plans = orch.plan_directory(dir.path()).await.unwrap();

        assert_eq!(plans.len(), 3);
        let names: Vec<&str> = plans.iter().map(|p| p.new_name.as_str()).collect();
        assert_eq!(names[0], "Team_Notes_MTG_20240101_Rev0.docx");
        assert_eq!(names[1], "Team_Notes_MTG_20240101_Rev0_1.docx");
        assert_eq!(names[2], "Team_Notes_MTG_20240101_Rev0_2.docx");

        // Suffixed plans carry the collision note
        assert!(plans[1].reason.contains("_1"));
        assert!(!plans[0].reason.contains("collision"));
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_heuristic() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("invoice_march 3 2023.pdf"), b"x").unwrap();

        let orch = orchestrator(Arc::new(FailingProvider));
        let plans = orch.plan_directory(dir.path()).await.unwrap();

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].new_name, "invoice_March_DOC_20230303_Rev0.pdf");
    }

    #[tokio::test]
    async fn test_identity_rename_keeps_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Team_Notes_MTG_20240101_Rev0.docx"), b"x").unwrap();

        let orch = orchestrator(Arc::new(ConstantProvider));
        let plans = orch.plan_directory(dir.path()).await.unwrap();

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].new_name, "Team_Notes_MTG_20240101_Rev0.docx");
        assert!(!plans[0].reason.contains("collision"));
    }

    #[tokio::test]
    async fn test_execute_renames_and_counts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("memo draft.docx"), b"x").unwrap();

        let orch = orchestrator(Arc::new(ConstantProvider));
        let plans = orch.plan_directory(dir.path()).await.unwrap();

        let history = History::new(dir.path().join("onomast_history.jsonl"));
        let outcome = NamingOrchestrator::execute(&plans, &history, false);

        assert_eq!(outcome.renamed, 1);
        assert_eq!(outcome.failed, 0);
        assert!(dir.path().join("Team_Notes_MTG_20240101_Rev0.docx").exists());
        assert!(!dir.path().join("memo draft.docx").exists());

        let entries = history.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].new_path,
            dir.path().join("Team_Notes_MTG_20240101_Rev0.docx")
        );
    }

    #[tokio::test]
    async fn test_execute_reports_vanished_source_as_failure() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("memo draft.docx"), b"x").unwrap();

        let orch = orchestrator(Arc::new(ConstantProvider));
        let plans = orch.plan_directory(dir.path()).await.unwrap();

        // Source disappears between planning and execution
        fs::remove_file(dir.path().join("memo draft.docx")).unwrap();

        let history = History::new(dir.path().join("onomast_history.jsonl"));
        let outcome = NamingOrchestrator::execute(&plans, &history, false);
        assert_eq!(outcome.renamed, 0);
        assert_eq!(outcome.failed, 1);
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("memo draft.docx"), b"x").unwrap();

        let orch = orchestrator(Arc::new(ConstantProvider));
        let plans = orch.plan_directory(dir.path()).await.unwrap();

        let history = History::new(dir.path().join("onomast_history.jsonl"));
        let outcome = NamingOrchestrator::execute(&plans, &history, true);

        assert_eq!(outcome.renamed, 1);
        assert!(dir.path().join("memo draft.docx").exists());
        assert!(history.read_all().unwrap().is_empty());
    }
}
