//! Rule evaluation engine.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use jet_shared::config::EngineConfig;
use rayon::prelude::*;
use tracing::{Span, debug, info, info_span, warn};
use uuid::Uuid;

use super::error::EngineError;
use super::report::RunReport;
use super::request::RunRequest;
use crate::model::Ledger;
use crate::rules::{Evaluate, RuleContext, RuleError, RuleId, RuleResult, RuleStatus};

/// How the engine schedules rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Evaluate rules concurrently.
    pub parallel: bool,
    /// Size of a dedicated worker pool. Uses the global rayon pool when unset.
    pub worker_threads: Option<usize>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            worker_threads: None,
        }
    }
}

impl From<&EngineConfig> for EngineOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            parallel: config.parallel,
            worker_threads: config.worker_threads,
        }
    }
}

/// Stateless JET engine. One instance can serve any number of runs.
pub struct JetEngine {
    options: EngineOptions,
    pool: Option<rayon::ThreadPool>,
}

impl JetEngine {
    /// Creates an engine.
    ///
    /// # Errors
    ///
    /// Returns an error when a dedicated pool is requested with zero workers
    /// or cannot be built.
    pub fn new(options: EngineOptions) -> Result<Self, EngineError> {
        let pool = match options.worker_threads {
            Some(0) => return Err(EngineError::InvalidWorkerThreads),
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|index| format!("jet-rule-{index}"))
                    .build()?,
            ),
            None => None,
        };
        Ok(Self { options, pool })
    }

    /// Returns the scheduling options.
    #[must_use]
    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Runs the selected rules and aggregates their results.
    ///
    /// Never fails: rule errors and panics become `ERROR` results. A01 is
    /// always evaluated so the aggregator knows whether to attach the
    /// validation caveat, but it is only reported when selected.
    #[must_use]
    pub fn run_scenarios(&self, request: &RunRequest) -> RunReport {
        let run_id = Uuid::now_v7();
        let selected = request.selected_rules();
        let span = info_span!(
            "jet_run",
            %run_id,
            rules = selected.len(),
            records = request.ledger.len()
        );
        let _guard = span.enter();

        let ledger = Ledger::from_table(&request.ledger);
        if ledger.skipped_records() > 0 {
            debug!(
                skipped = ledger.skipped_records(),
                "Records that could not be typed are excluded from analytical rules"
            );
        }

        let ctx = RuleContext {
            table: &request.ledger,
            ledger: &ledger,
            opening: request.opening_tb.as_ref(),
            closing: request.closing_tb.as_ref(),
            params: &request.params,
            aux: &request.aux,
        };

        let validation = evaluate_rule(RuleId::A01, &ctx);
        let validation_passed = validation.status == RuleStatus::Pass;

        let pending: Vec<RuleId> = selected
            .iter()
            .copied()
            .filter(|id| *id != RuleId::A01)
            .collect();
        let mut results = self.evaluate_all(&pending, &ctx, &span);
        if selected.contains(&RuleId::A01) {
            results.push(validation);
        }

        let report = RunReport::aggregate(run_id, validation_passed, results);
        let counts = report.counts();
        info!(
            validation_passed,
            pass = counts.pass,
            warn = counts.warn,
            fail = counts.fail,
            error = counts.error,
            "JET run completed"
        );
        report
    }

    fn evaluate_all(&self, ids: &[RuleId], ctx: &RuleContext<'_>, span: &Span) -> Vec<RuleResult> {
        let parallel = self.options.parallel;
        let run = || -> Vec<RuleResult> {
            if parallel {
                ids.par_iter()
                    .map(|id| span.in_scope(|| evaluate_rule(*id, ctx)))
                    .collect()
            } else {
                ids.iter().map(|id| evaluate_rule(*id, ctx)).collect()
            }
        };

        match &self.pool {
            Some(pool) if parallel => pool.install(run),
            _ => run(),
        }
    }
}

/// Evaluates one rule through the catalog.
fn evaluate_rule(id: RuleId, ctx: &RuleContext<'_>) -> RuleResult {
    evaluate_with(id, id.meta().evaluate, ctx)
}

fn evaluate_with(id: RuleId, evaluate: Evaluate, ctx: &RuleContext<'_>) -> RuleResult {
    let result = match panic::catch_unwind(AssertUnwindSafe(|| evaluate(ctx))) {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            if err.result_status() == RuleStatus::Error {
                warn!(rule = %id, code = err.error_code(), error = %err, "Rule could not be evaluated");
            }
            RuleResult::from_error(id, &err)
        }
        Err(payload) => {
            let err = RuleError::Internal(panic_message(payload.as_ref()));
            warn!(rule = %id, error = %err, "Rule panicked");
            RuleResult::from_error(id, &err)
        }
    };

    debug!(
        rule = %id,
        status = %result.status,
        flagged = result.flagged_count(),
        "Rule evaluated"
    );
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
