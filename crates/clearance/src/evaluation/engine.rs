//! Evaluation orchestration.
//!
//! `AccessEvaluator` wires the scorers, the decision state machine, and
//! the audit trail over injected collaborators. Collaborator reads run
//! under a per-scorer time budget; a read that misses its budget or
//! fails degrades that dimension to a neutral score instead of failing
//! the evaluation, and the substitution is flagged in the audit event.

use std::future::Future;
use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, warn};

use super::audit::{AuditEmitter, AuditEvent, DegradedSignals};
use super::config::EvaluationConfig;
use super::decision::{Decision, DecisionState, DenialReason, Verdict};
use super::domain::AccessRequest;
use super::policy::match_policies;
use super::scoring::anomaly::score_anomaly;
use super::scoring::context::score_context;
use super::scoring::history::score_history;
use super::scoring::intent::score_rationale;
use super::scoring::{ConfidenceBreakdown, ScoreFactor, NEUTRAL_SCORE};
use super::store::{AuditSink, HistoryStore, PolicyStore, RateLimiter, StoreError};
use super::validation::{RequestValidator, ValidationError};

/// The access evaluation engine.
pub struct AccessEvaluator<P, H, R, S> {
    policies: Arc<P>,
    history: Arc<H>,
    rate: Arc<R>,
    audit: AuditEmitter<S>,
    validator: RequestValidator,
    config: EvaluationConfig,
}

impl<P, H, R, S> AccessEvaluator<P, H, R, S>
where
    P: PolicyStore,
    H: HistoryStore,
    R: RateLimiter,
    S: AuditSink,
{
    pub fn new(
        policies: Arc<P>,
        history: Arc<H>,
        rate: Arc<R>,
        audit_sink: Arc<S>,
        config: EvaluationConfig,
    ) -> Self {
        let validator =
            RequestValidator::new(config.min_rationale_chars, config.min_rationale_words);
        let audit = AuditEmitter::new(audit_sink, config.audit_budget());
        Self {
            policies,
            history,
            rate,
            audit,
            validator,
            config,
        }
    }

    /// Evaluate one access request to a decision.
    ///
    /// Validation is the only error path; everything downstream resolves
    /// to a verdict. Each evaluation is self-contained, so re-submitting
    /// the same request yields the same decision against the same
    /// collaborator state.
    pub async fn evaluate(&self, request: AccessRequest) -> Result<Decision, ValidationError> {
        self.validator.check(&request)?;

        let mut degraded = DegradedSignals::default();

        let snapshot = match self.bounded(self.policies.active_policies(&request.resource)).await {
            Some(snapshot) => snapshot,
            None => {
                warn!(
                    resource = %request.resource,
                    "policy snapshot unavailable, evaluating against an empty set"
                );
                degraded.policy_snapshot = true;
                Vec::new()
            }
        };
        let candidates = match_policies(&snapshot, &request.resource);

        let primary = match candidates.first() {
            Some(policy) => policy.clone(),
            None => {
                debug!(resource = %request.resource, "no applicable policy for resource");
                let decision = Decision {
                    verdict: Verdict::Denied,
                    breakdown: ConfidenceBreakdown {
                        role_match: 0.0,
                        intent_clarity: 0.0,
                        historical_pattern: 0.0,
                        context_validity: 0.0,
                        anomaly_score: 0.0,
                    },
                    aggregate: 0.0,
                    evaluated_policies: Vec::new(),
                    denial_reason: Some(DenialReason::NoApplicablePolicy),
                };
                self.audit
                    .emit(AuditEvent::for_evaluation(&request, &decision, degraded))
                    .await;
                return Ok(decision);
            }
        };

        let state = DecisionState::Unevaluated.screen_roles(
            candidates
                .iter()
                .any(|policy| policy.permits_role(&request.role)),
        );

        let role_match = if primary.permits_role(&request.role) {
            100.0
        } else {
            0.0
        };

        let budget = self.config.scorer_budget();
        let intent_task = timeout(budget, async {
            score_rationale(&request.rationale, &self.config.lexicon).0
        });
        let history_task = self.bounded(async {
            let outcomes = self
                .history
                .recent_outcomes(
                    &request.requester,
                    &request.resource,
                    self.config.history_window,
                )
                .await?;
            Ok(score_history(&outcomes, self.config.history_window))
        });
        let context_task = timeout(budget, async {
            score_context(&primary, request.submitted_at, &request.context).0
        });
        let (intent_res, history_res, context_res) =
            tokio::join!(intent_task, history_task, context_task);

        let intent_clarity =
            effective_score(intent_res.ok(), ScoreFactor::IntentClarity, &mut degraded);
        let historical_pattern =
            effective_score(history_res, ScoreFactor::HistoricalPattern, &mut degraded);
        let context_validity =
            effective_score(context_res.ok(), ScoreFactor::ContextValidity, &mut degraded);

        // Anomaly runs last: it consumes the effective values of the
        // other dimensions, substitutions included.
        let anomaly_res = self
            .bounded(async {
                let utilization = self.rate.utilization_ratio(&request.requester).await?;
                Ok(score_anomaly(
                    intent_clarity,
                    historical_pattern,
                    context_validity,
                    utilization,
                ))
            })
            .await;
        let anomaly_score = effective_score(anomaly_res, ScoreFactor::AnomalyScore, &mut degraded);

        let breakdown = ConfidenceBreakdown {
            role_match,
            intent_clarity,
            historical_pattern,
            context_validity,
            anomaly_score,
        };
        let aggregate = breakdown.aggregate();

        let state = state.absorb_score(aggregate).finalize(&primary);
        let (verdict, denial_reason) = match state {
            DecisionState::Decided { verdict, reason } => (verdict, reason),
            _ => (Verdict::Denied, Some(DenialReason::ConfidenceTooLow)),
        };

        let decision = Decision {
            verdict,
            breakdown,
            aggregate,
            evaluated_policies: candidates.iter().map(|policy| policy.id.clone()).collect(),
            denial_reason,
        };

        debug!(
            requester = %request.requester,
            resource = %request.resource,
            verdict = decision.verdict.label(),
            aggregate = decision.aggregate,
            "evaluation complete"
        );

        self.audit
            .emit(AuditEvent::for_evaluation(&request, &decision, degraded))
            .await;

        Ok(decision)
    }

    /// Run a collaborator read under the scorer budget. A miss or a
    /// store error both resolve to `None` so the caller can substitute.
    async fn bounded<T, F>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match timeout(self.config.scorer_budget(), fut).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                warn!(error = %err, "collaborator read failed");
                None
            }
            Err(_) => {
                warn!(
                    budget_ms = self.config.scorer_budget_ms,
                    "collaborator read exceeded its budget"
                );
                None
            }
        }
    }
}

fn effective_score(
    score: Option<f64>,
    factor: ScoreFactor,
    degraded: &mut DegradedSignals,
) -> f64 {
    match score {
        Some(value) => value,
        None => {
            warn!(
                factor = factor.label(),
                "substituting neutral score for unavailable dimension"
            );
            degraded.factors.push(factor);
            NEUTRAL_SCORE
        }
    }
}
