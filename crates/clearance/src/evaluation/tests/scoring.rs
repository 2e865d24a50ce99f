use super::common::*;
use crate::evaluation::decision::Verdict;
use crate::evaluation::domain::{NetworkZone, PastOutcome};
use crate::evaluation::policy::{AccessCheck, HourWindow, Weekday};
use crate::evaluation::scoring::anomaly::score_anomaly;
use crate::evaluation::scoring::context::{score_context, ContextViolation};
use crate::evaluation::scoring::history::score_history;
use crate::evaluation::scoring::{ConfidenceBreakdown, ScoreFactor};

#[test]
fn empty_history_scores_neutral() {
    assert!((score_history(&[], 20) - 50.0).abs() < f64::EPSILON);
}

#[test]
fn uniform_histories_hit_the_extremes() {
    let approvals = vec![approval(at(2025, 3, 1, 9)); 6];
    assert!((score_history(&approvals, 20) - 100.0).abs() < 1e-9);

    let rejections = vec![rejection(at(2025, 3, 1, 9)); 6];
    assert!(score_history(&rejections, 20).abs() < 1e-9);
}

#[test]
fn recent_outcomes_weigh_more_than_old_ones() {
    let newest_approved = vec![approval(at(2025, 5, 2, 9)), rejection(at(2025, 5, 1, 9))];
    let newest_rejected = vec![rejection(at(2025, 5, 2, 9)), approval(at(2025, 5, 1, 9))];

    assert!(score_history(&newest_approved, 20) > score_history(&newest_rejected, 20));
}

#[test]
fn decay_follows_position_not_timestamp() {
    let outcomes = vec![
        approval(at(2025, 5, 3, 9)),
        rejection(at(2025, 5, 2, 9)),
        rejection(at(2025, 5, 1, 9)),
    ];

    let expected = 100.0 / (1.0 + 0.9 + 0.81);
    assert!((score_history(&outcomes, 20) - expected).abs() < 1e-9);
}

#[test]
fn window_limits_how_far_back_scoring_looks() {
    let mut outcomes = vec![rejection(at(2025, 5, 9, 9))];
    outcomes.extend(vec![approval(at(2025, 5, 1, 9)); 10]);

    assert!(score_history(&outcomes, 1).abs() < 1e-9);
    assert!(score_history(&outcomes, 20) > 80.0);
}

#[test]
fn verification_grants_count_as_approvals() {
    let outcomes = vec![PastOutcome {
        verdict: Verdict::GrantedWithVerification,
        decided_at: at(2025, 5, 1, 9),
    }];
    assert!((score_history(&outcomes, 20) - 100.0).abs() < 1e-9);
}

#[test]
fn unrestricted_policy_scores_full_context() {
    let open = policy("pol-a", "library_database", &["student"]);
    let req = request("student", "library_database", "archive work for the semester");

    let (score, violations) = score_context(&open, req.submitted_at, &req.context);

    assert!((score - 100.0).abs() < f64::EPSILON);
    assert!(violations.is_empty());
}

#[test]
fn off_hours_submission_costs_one_penalty() {
    let mut gated = policy("pol-a", "library_database", &["student"]);
    gated.allowed_hours = Some(HourWindow { start: 8, end: 12 });
    // fixture submits at 14:00
    let req = request("student", "library_database", "archive work for the semester");

    let (score, violations) = score_context(&gated, req.submitted_at, &req.context);

    assert!((score - 70.0).abs() < f64::EPSILON);
    assert_eq!(violations, vec![ContextViolation::OutsideAllowedHours]);
}

#[test]
fn each_violated_restriction_deducts_thirty() {
    let mut gated = policy("pol-a", "library_database", &["student"]);
    gated.allowed_hours = Some(HourWindow { start: 8, end: 12 });
    gated.allowed_days = Some([Weekday::Saturday, Weekday::Sunday].into_iter().collect());
    gated.required_checks = vec![AccessCheck::MultiPartyApproval];
    // fixture submits Wednesday 14:00
    let req = request("student", "library_database", "weekend archive maintenance run");

    let (score, violations) = score_context(&gated, req.submitted_at, &req.context);

    assert!((score - 10.0).abs() < f64::EPSILON);
    assert_eq!(violations.len(), 3);
}

#[test]
fn context_score_floors_at_zero() {
    let mut gated = policy("pol-a", "library_database", &["student"]);
    gated.allowed_hours = Some(HourWindow { start: 8, end: 12 });
    gated.allowed_days = Some([Weekday::Saturday].into_iter().collect());
    gated.required_checks = vec![
        AccessCheck::ManagedDevice,
        AccessCheck::CampusNetwork,
        AccessCheck::MultiPartyApproval,
    ];
    let mut req = request("student", "library_database", "late external maintenance attempt");
    req.context.network = NetworkZone::External;
    req.context.device.managed = false;

    let (score, violations) = score_context(&gated, req.submitted_at, &req.context);

    assert!(score.abs() < f64::EPSILON);
    assert_eq!(violations.len(), 5);
}

#[test]
fn violations_explain_themselves() {
    let check = ContextViolation::CheckNotSatisfiable(AccessCheck::MultiPartyApproval);
    assert_eq!(
        check.describe(),
        "required check not satisfied: multi-party-approval"
    );
    assert_eq!(
        ContextViolation::OutsideAllowedHours.describe(),
        "submitted outside the policy's allowed hours"
    );
}

#[test]
fn agreeing_scores_raise_no_flags() {
    // spread of {70, 50, 100} sits under the limit
    assert!((score_anomaly(70.0, 50.0, 100.0, 0.0) - 100.0).abs() < f64::EPSILON);
}

#[test]
fn wide_spread_costs_twenty() {
    // spread of {10, 50, 100} exceeds the limit
    assert!((score_anomaly(10.0, 50.0, 100.0, 0.0) - 80.0).abs() < f64::EPSILON);
}

#[test]
fn heavy_rate_usage_costs_thirty() {
    assert!((score_anomaly(50.0, 50.0, 50.0, 0.9) - 70.0).abs() < f64::EPSILON);
}

#[test]
fn rate_limit_boundary_is_exclusive() {
    assert!((score_anomaly(50.0, 50.0, 50.0, 0.8) - 100.0).abs() < f64::EPSILON);
}

#[test]
fn both_anomaly_flags_stack() {
    assert!((score_anomaly(10.0, 50.0, 100.0, 0.9) - 50.0).abs() < f64::EPSILON);
}

#[test]
fn weights_sum_to_one() {
    let total: f64 = [
        ScoreFactor::RoleMatch,
        ScoreFactor::IntentClarity,
        ScoreFactor::HistoricalPattern,
        ScoreFactor::ContextValidity,
        ScoreFactor::AnomalyScore,
    ]
    .iter()
    .map(|factor| factor.weight())
    .sum();

    assert!((total - 1.0).abs() < f64::EPSILON);
}

#[test]
fn aggregate_blends_the_documented_weights() {
    let breakdown = ConfidenceBreakdown {
        role_match: 100.0,
        intent_clarity: 70.0,
        historical_pattern: 50.0,
        context_validity: 100.0,
        anomaly_score: 100.0,
    };

    assert!((breakdown.aggregate() - 82.5).abs() < 1e-9);
}

#[test]
fn aggregate_recombines_from_components() {
    let breakdown = ConfidenceBreakdown {
        role_match: 100.0,
        intent_clarity: 70.0,
        historical_pattern: 50.0,
        context_validity: 100.0,
        anomaly_score: 100.0,
    };

    let recombined: f64 = breakdown
        .components()
        .iter()
        .map(|(factor, score)| factor.weight() * score)
        .sum();

    assert!((breakdown.aggregate() - recombined).abs() < 1e-6);
}

#[test]
fn perfect_components_aggregate_to_one_hundred() {
    let breakdown = ConfidenceBreakdown {
        role_match: 100.0,
        intent_clarity: 100.0,
        historical_pattern: 100.0,
        context_validity: 100.0,
        anomaly_score: 100.0,
    };

    assert!((breakdown.aggregate() - 100.0).abs() < 1e-9);
}

#[test]
fn component_lookup_matches_fields() {
    let breakdown = ConfidenceBreakdown {
        role_match: 10.0,
        intent_clarity: 20.0,
        historical_pattern: 30.0,
        context_validity: 40.0,
        anomaly_score: 50.0,
    };

    assert!((breakdown.component(ScoreFactor::HistoricalPattern) - 30.0).abs() < f64::EPSILON);
    assert!((breakdown.component(ScoreFactor::AnomalyScore) - 50.0).abs() < f64::EPSILON);
}
