//! Crawl orchestrator - the single consuming control flow
//!
//! The orchestrator seeds the scheduler, blocks for each outcome it needs,
//! delegates page interpretation to the extractors, and enqueues newly
//! discovered paths at the correct stage priority. It is the only place that
//! decides what a failure means: a bootstrap failure aborts the run, any
//! region- or team-level failure skips that unit and is recorded in the run
//! report.

use crate::audit::AuditLog;
use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::scheduler::{PageRequest, Scheduler, StagePriority};
use crate::crawler::store::ResponseStore;
use crate::crawler::worker::WorkerPool;
use crate::dataset::{Dataset, TeamRecord};
use crate::extract;
use crate::extract::RankingPage;
use crate::{ScoutError, StageError};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Path of the top-level ranking index, the bootstrap request
const RANKINGS_INDEX: &str = "/rankings";

/// Which kind of unit a skip applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipUnit {
    Region,
    Team,
}

/// One skipped unit of work
#[derive(Debug, Clone)]
pub struct SkipRecord {
    pub unit: SkipUnit,
    pub path: String,
    pub reason: String,
}

/// Structured summary of a finished run
///
/// Partial failures are enumerable here rather than only in the audit log: a
/// run that skipped anything reports every skip with its unit and reason.
#[derive(Debug, Default)]
pub struct RunReport {
    pub regions_crawled: usize,
    pub teams_added: usize,
    pub teams_already_present: usize,
    pub skips: Vec<SkipRecord>,
}

impl RunReport {
    /// Whether the run finished without skipping any unit
    pub fn is_clean(&self) -> bool {
        self.skips.is_empty()
    }

    fn skip(&mut self, unit: SkipUnit, path: &str, error: &StageError) {
        tracing::warn!("Skipping {:?} '{}': {}", unit, path, error);
        self.skips.push(SkipRecord {
            unit,
            path: path.to_string(),
            reason: error.to_string(),
        });
    }
}

/// Main orchestrator structure
pub struct Orchestrator {
    config: Config,
    scheduler: Arc<Scheduler>,
    store: Arc<ResponseStore>,
    dataset: Dataset,
    report: RunReport,
    cancel: CancellationToken,
    pool: Option<WorkerPool>,
}

impl Orchestrator {
    /// Creates the orchestrator and spawns the fetch worker pool.
    ///
    /// Opens the dataset (resuming from an existing file if present) and the
    /// audit log, builds the shared HTTP client, and starts
    /// `config.crawler.workers` fetch tasks.
    pub fn new(config: Config) -> Result<Self, ScoutError> {
        let dataset = Dataset::open(Path::new(&config.output.dataset_path))?;
        if !dataset.is_empty() {
            tracing::info!(
                "Resuming: {} teams already in {}",
                dataset.len(),
                config.output.dataset_path
            );
        }

        let audit = Arc::new(AuditLog::create(Path::new(&config.output.audit_log_path))?);
        let client = build_http_client(&config.site.user_agent, &config.crawler)?;

        let scheduler = Arc::new(Scheduler::new());
        let store = Arc::new(ResponseStore::new());
        let cancel = CancellationToken::new();

        let pool = WorkerPool::spawn(
            scheduler.clone(),
            store.clone(),
            audit,
            client,
            config.site.clone(),
            config.crawler.clone(),
            cancel.clone(),
        );

        Ok(Self {
            config,
            scheduler,
            store,
            dataset,
            report: RunReport::default(),
            cancel,
            pool: Some(pool),
        })
    }

    /// Runs the full crawl and returns the run report.
    ///
    /// Workers are cancelled and joined, and the dataset gets a final save,
    /// on every exit path including a bootstrap abort.
    pub async fn run(mut self) -> Result<RunReport, ScoutError> {
        let crawl_result = self.crawl().await;

        self.cancel.cancel();
        if let Some(pool) = self.pool.take() {
            pool.shutdown().await;
        }
        let save_result = self.dataset.save();

        let report = crawl_result?;
        save_result?;

        tracing::info!(
            "Run finished: {} regions, {} teams added, {} already present, {} skips",
            report.regions_crawled,
            report.teams_added,
            report.teams_already_present,
            report.skips.len()
        );
        Ok(report)
    }

    async fn crawl(&mut self) -> Result<RunReport, ScoutError> {
        // Bootstrap: the ranking index. Any failure here aborts the run.
        self.enqueue(RANKINGS_INDEX, StagePriority::Ranking);
        let index_body =
            self.retrieve_page(RANKINGS_INDEX)
                .await
                .map_err(|e| ScoutError::Bootstrap {
                    path: RANKINGS_INDEX.to_string(),
                    reason: e.to_string(),
                })?;

        let rankings = extract::region_ranking_paths(&index_body).map_err(|e| {
            ScoutError::Bootstrap {
                path: RANKINGS_INDEX.to_string(),
                reason: e.to_string(),
            }
        })?;
        tracing::info!("Discovered {} regional rankings", rankings.len());

        for ranking in &rankings {
            self.enqueue(ranking, StagePriority::Ranking);
        }

        for ranking in &rankings {
            tracing::info!("Starting ranking '{}' extraction", ranking);
            self.process_region(ranking).await?;
        }

        Ok(std::mem::take(&mut self.report))
    }

    /// Processes one regional ranking: extracts its teams and assembles a
    /// record per team. Stage failures skip the region or team; only dataset
    /// persistence errors propagate.
    async fn process_region(&mut self, ranking_path: &str) -> Result<(), ScoutError> {
        let page = match self.fetch_ranking(ranking_path).await {
            Ok(page) => page,
            Err(e) => {
                self.report.skip(SkipUnit::Region, ranking_path, &e);
                return Ok(());
            }
        };
        self.report.regions_crawled += 1;

        for team_path in &page.team_paths {
            self.enqueue(team_path, StagePriority::Team);
        }

        // Teams are visited in listing order; the 1-based index is the rank
        // carried on the persisted record.
        for (idx, team_path) in page.team_paths.iter().enumerate() {
            let rank = idx as u32 + 1;
            match self
                .assemble_team(ranking_path, &page.region, rank, team_path)
                .await
            {
                Ok(Some(record)) => {
                    tracing::info!("Team '{}' added to dataset", record.name);
                    self.dataset.add_team(record)?;
                    self.report.teams_added += 1;
                }
                Ok(None) => {
                    tracing::info!("Team '{}' already in dataset, skipping", team_path);
                    self.report.teams_already_present += 1;
                }
                Err(e) => self.report.skip(SkipUnit::Team, team_path, &e),
            }
        }

        Ok(())
    }

    async fn fetch_ranking(&self, ranking_path: &str) -> Result<RankingPage, StageError> {
        let body = self.retrieve_page(ranking_path).await?;
        extract::ranking_page(&body, self.config.crawler.teams_per_ranking)
            .map_err(|e| extract_failure(ranking_path, e))
    }

    /// Assembles one team record, or `None` if the team is already in the
    /// dataset. A dataset hit enqueues no sub-pages at all.
    async fn assemble_team(
        &self,
        ranking_path: &str,
        region: &str,
        rank: u32,
        team_path: &str,
    ) -> Result<Option<TeamRecord>, StageError> {
        let body = self.retrieve_page(team_path).await?;

        let id =
            extract::team_id_from_path(team_path).map_err(|e| extract_failure(team_path, e))?;
        if self.dataset.has_team(&id) {
            return Ok(None);
        }

        let identity = extract::team_page(&body).map_err(|e| extract_failure(team_path, e))?;
        let matchlist = extract::matchlist_path(&body).map_err(|e| extract_failure(team_path, e))?;
        let stats = extract::stats_path(&body).map_err(|e| extract_failure(team_path, e))?;

        self.enqueue(&matchlist, StagePriority::TeamSubpage);
        self.enqueue(&stats, StagePriority::TeamSubpage);

        let matchlist_body = self.retrieve_page(&matchlist).await?;
        let recent_results = extract::recent_results(&matchlist_body)
            .map_err(|e| extract_failure(&matchlist, e))?;

        let stats_body = self.retrieve_page(&stats).await?;
        let map_stats = extract::map_stats(&stats_body).map_err(|e| extract_failure(&stats, e))?;

        let host = &self.config.site.host;
        Ok(Some(TeamRecord {
            id,
            name: identity.name,
            players: identity.players,
            coach: identity.coach,
            region: region.to_string(),
            rank,
            recent_results,
            map_stats,
            urls: vec![
                format!("{}{}", host, ranking_path),
                format!("{}{}", host, team_path),
                format!("{}{}", host, matchlist),
                format!("{}{}", host, stats),
            ],
        }))
    }

    fn enqueue(&self, path: &str, stage: StagePriority) {
        self.scheduler.enqueue(PageRequest::new(path, stage));
    }

    /// Blocks for the outcome of `path`, treating a timeout or non-2xx
    /// status as a stage failure.
    async fn retrieve_page(&self, path: &str) -> Result<String, StageError> {
        let timeout = Duration::from_secs(self.config.crawler.retrieve_timeout_secs);
        let outcome = self.store.retrieve_timeout(path, timeout).await?;

        if !outcome.is_success() {
            return Err(StageError::HttpStatus {
                path: path.to_string(),
                status: outcome.status,
            });
        }
        Ok(outcome.body)
    }
}

fn extract_failure(path: &str, source: extract::ExtractError) -> StageError {
    StageError::Extract {
        path: path.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_report() {
        let report = RunReport::default();
        assert!(report.is_clean());
    }

    #[test]
    fn test_skip_marks_report_partial() {
        let mut report = RunReport::default();
        report.skip(
            SkipUnit::Team,
            "/team/1001/heretics",
            &StageError::Timeout {
                path: "/team/1001/heretics".to_string(),
            },
        );

        assert!(!report.is_clean());
        assert_eq!(report.skips.len(), 1);
        assert_eq!(report.skips[0].unit, SkipUnit::Team);
        assert!(report.skips[0].reason.contains("Timed out"));
    }
}
