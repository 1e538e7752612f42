//! Resumable scoring pipeline.
//!
//! Walks source rows in ascending order starting from the resume checkpoint,
//! derives a lookup key per row, scores each unique key once, and appends one
//! record per key to the result log. The first failure stops the run; the log
//! is already durable up to the last written record, so relaunching picks up
//! where this run stopped.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use bulkscore_client::{CustomerFit, ScoringClient, ScoringError};
use bulkscore_core::{LookupKey, ScoreMode};
use thiserror::Error;

use crate::output::format_record;
use crate::result_log::ResultLog;
use crate::sheet::{Sheet, SheetError};

/// Source of customer-fit results for lookup keys.
pub(crate) trait Scorer {
    async fn score(&self, mode: ScoreMode, key: &LookupKey) -> Result<CustomerFit, ScoringError>;
}

impl Scorer for ScoringClient {
    async fn score(&self, mode: ScoreMode, key: &LookupKey) -> Result<CustomerFit, ScoringError> {
        ScoringClient::score(self, mode, key).await
    }
}

#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error("scoring {key} failed: {source}")]
    Scoring {
        key: LookupKey,
        #[source]
        source: ScoringError,
    },

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("failed to write result log: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipReason {
    EmptyCell,
    NoMatch,
}

/// What happened to a single source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowOutcome {
    Skipped(SkipReason),
    /// Key was written by an earlier run.
    AlreadyWritten,
    /// Key was scored earlier in this run; the cached result stands.
    Deduplicated,
    Written,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) rows_visited: u32,
    pub(crate) skipped_empty: u32,
    pub(crate) skipped_no_match: u32,
    pub(crate) already_written: u32,
    pub(crate) deduplicated: u32,
    pub(crate) written: u32,
    pub(crate) api_calls: u32,
}

impl RunSummary {
    fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Skipped(SkipReason::EmptyCell) => self.skipped_empty += 1,
            RowOutcome::Skipped(SkipReason::NoMatch) => self.skipped_no_match += 1,
            RowOutcome::AlreadyWritten => self.already_written += 1,
            RowOutcome::Deduplicated => self.deduplicated += 1,
            RowOutcome::Written => self.written += 1,
        }
    }
}

/// Everything one run owns: the scorer handle, the mode, the dedup cache,
/// and the result log.
pub(crate) struct RunContext<'a, S> {
    scorer: &'a S,
    mode: ScoreMode,
    column: u32,
    progress_interval: u32,
    cache: HashMap<LookupKey, CustomerFit>,
    log: ResultLog,
    summary: RunSummary,
}

impl<'a, S: Scorer> RunContext<'a, S> {
    pub(crate) fn new(
        scorer: &'a S,
        mode: ScoreMode,
        column: u32,
        progress_interval: u32,
        log: ResultLog,
    ) -> Self {
        Self {
            scorer,
            mode,
            column,
            progress_interval: progress_interval.max(1),
            cache: HashMap::new(),
            log,
            summary: RunSummary::default(),
        }
    }

    /// Processes rows `start_row..=sheet.row_count()` in order.
    ///
    /// On the first error the log is flushed and the error returned; no
    /// further rows are read.
    pub(crate) async fn run(
        &mut self,
        sheet: &Sheet,
        start_row: u32,
    ) -> Result<RunSummary, PipelineError> {
        let total = sheet.row_count();

        for row in start_row..=total {
            if row % self.progress_interval == 0 {
                let percent = f64::from(row) / f64::from(total) * 100.0;
                tracing::info!(row, total, "currently at {percent:.1}%");
            }

            self.summary.rows_visited += 1;
            match self.process_row(sheet, row).await {
                Ok(outcome) => self.summary.record(outcome),
                Err(e) => {
                    if let Err(flush_err) = self.log.flush() {
                        tracing::warn!(error = %flush_err, "failed to flush result log while aborting");
                    }
                    return Err(e);
                }
            }
        }

        Ok(self.summary)
    }

    /// Reads one row and, when it yields a new key, scores it and writes the
    /// record.
    pub(crate) async fn process_row(
        &mut self,
        sheet: &Sheet,
        row: u32,
    ) -> Result<RowOutcome, PipelineError> {
        let Some(raw) = sheet.cell(self.column, row)? else {
            return Ok(RowOutcome::Skipped(SkipReason::EmptyCell));
        };

        tracing::debug!(row, value = %raw, "scoring");
        let Some(key) = self.mode.derive_key(&raw) else {
            return Ok(RowOutcome::Skipped(SkipReason::NoMatch));
        };

        if !self.cache.contains_key(&key) && self.log.contains(&key) {
            return Ok(RowOutcome::AlreadyWritten);
        }

        let fit = match self.cache.entry(key.clone()) {
            Entry::Occupied(_) => return Ok(RowOutcome::Deduplicated),
            Entry::Vacant(slot) => {
                let fit = self
                    .scorer
                    .score(self.mode, &key)
                    .await
                    .map_err(|source| PipelineError::Scoring {
                        key: key.clone(),
                        source,
                    })?;
                self.summary.api_calls += 1;
                slot.insert(fit)
            }
        };

        let line = format_record(&key, fit);
        self.log.append(&key, &line)?;
        tracing::debug!(row, key = %key, segment = %fit.segment, "recorded");
        Ok(RowOutcome::Written)
    }

    pub(crate) fn flush(&mut self) -> std::io::Result<()> {
        self.log.flush()
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
