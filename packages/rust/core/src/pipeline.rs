//! End-to-end enrichment run: load → fetch → extract → report.

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use walkscore_fetcher::Fetcher;
use walkscore_shared::{AppConfig, FetchConfig, InputRecord, OutputRecord, Result, WalkScoreError};

use crate::loader;
use crate::report::{self, START_BANNER, STOP_BANNER};

/// Configuration for one enrichment run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// CSV file with the cities to score.
    pub input_path: PathBuf,
    /// Outbound request settings.
    pub fetch: FetchConfig,
}

impl From<&AppConfig> for RunConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            input_path: config.input.path.clone(),
            fetch: config.fetch.clone(),
        }
    }
}

/// Counts gathered over one run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Rows read from the input table.
    pub records_loaded: usize,
    /// Rows written to the output.
    pub rows_emitted: usize,
    /// Records dropped after a fetch failure.
    pub records_skipped: usize,
    /// Emitted rows that carry the not-found sentinel.
    pub scores_not_found: usize,
    /// Wall time of the run.
    pub elapsed: Duration,
}

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a record's page is fetched. `current` is 1-based.
    fn record_started(&self, record: &InputRecord, current: usize, total: usize);
    /// Called when a record is dropped.
    fn record_skipped(&self, record: &InputRecord, error: &WalkScoreError);
    /// Called when the run completes.
    fn done(&self, summary: &RunSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn record_started(&self, _record: &InputRecord, _current: usize, _total: usize) {}
    fn record_skipped(&self, _record: &InputRecord, _error: &WalkScoreError) {}
    fn done(&self, _summary: &RunSummary) {}
}

/// Run the enrichment and write banners and result rows to `out`.
///
/// 1. Load the whole input table (any malformed row aborts before fetching)
/// 2. Fetch each record's page, one at a time
/// 3. Extract the score from the body
/// 4. Print the accumulated rows
///
/// Fetch failures skip the record; load, config, and output failures abort.
#[instrument(skip_all, fields(input = %config.input_path.display()))]
pub async fn run<W: Write + ?Sized>(
    config: &RunConfig,
    out: &mut W,
    progress: &dyn ProgressReporter,
) -> Result<RunSummary> {
    let start = Instant::now();

    report::write_banner(out, START_BANNER)?;
    out.flush()?;

    // --- Phase 1: Load ---
    progress.phase("Loading input");
    let records = loader::load_records(&config.input_path)?;
    let fetcher = Fetcher::new(&config.fetch)?;

    info!(
        records = records.len(),
        base_url = %fetcher.base_url(),
        "starting enrichment"
    );

    let mut summary = RunSummary {
        records_loaded: records.len(),
        ..RunSummary::default()
    };

    // --- Phase 2: Fetch + extract ---
    progress.phase("Fetching pages");
    let mut rows = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        progress.record_started(record, idx + 1, records.len());

        match enrich_record(&fetcher, record).await {
            Ok(row) => {
                if !row.score.is_found() {
                    summary.scores_not_found += 1;
                }
                rows.push(row);
            }
            Err(e) if e.is_recoverable() => {
                warn!(
                    label = %record.label,
                    region_code = %record.region_code,
                    locality_name = %record.locality_name,
                    error = %e,
                    "skipping record"
                );
                progress.record_skipped(record, &e);
                summary.records_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    // --- Phase 3: Report ---
    progress.phase("Writing results");
    report::write_records(out, &rows)?;
    report::write_banner(out, STOP_BANNER)?;
    out.flush()?;

    summary.rows_emitted = rows.len();
    summary.elapsed = start.elapsed();

    info!(
        loaded = summary.records_loaded,
        emitted = summary.rows_emitted,
        skipped = summary.records_skipped,
        not_found = summary.scores_not_found,
        duration_ms = summary.elapsed.as_millis(),
        "enrichment completed"
    );

    progress.done(&summary);
    Ok(summary)
}

/// Fetch one record's page and pair the record with its score.
pub async fn enrich_record(fetcher: &Fetcher, record: &InputRecord) -> Result<OutputRecord> {
    let url = fetcher.record_url(&record.region_code, &record.locality_name)?;
    let page = fetcher.fetch(&url).await?;
    let score = walkscore_extractor::extract_score(&page.body);

    Ok(OutputRecord::from_input(record, score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkscore_shared::Score;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn run_config_from_app_config() {
        let app = AppConfig::default();
        let run = RunConfig::from(&app);
        assert_eq!(run.input_path, PathBuf::from("input_cities.csv"));
        assert_eq!(run.fetch.timeout_secs, 30);
    }

    #[tokio::test]
    async fn enrich_record_pairs_score() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/WA/Seattle"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("pp.walk.sc/badge/walk/score/73.png"),
            )
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&FetchConfig {
            base_url: server.uri(),
            ..FetchConfig::default()
        })
        .unwrap();

        let record = InputRecord::new("A", "x", "WA", "Seattle");
        let row = enrich_record(&fetcher, &record).await.unwrap();
        assert_eq!(row.score, Score::Value("73".into()));
        assert_eq!(row.label, "A");
    }

    #[tokio::test]
    async fn enrich_record_empty_region_is_still_fetched() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("pp.walk.sc/badge/walk/score/50.png"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&FetchConfig {
            base_url: server.uri(),
            ..FetchConfig::default()
        })
        .unwrap();

        let record = InputRecord::new("A", "x", "", "Seattle");
        let row = enrich_record(&fetcher, &record).await.unwrap();
        assert_eq!(row.region_code, "");
        assert_eq!(row.score, Score::Value("50".into()));
    }
}
