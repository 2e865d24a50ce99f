use crate::infra::{
    seeded_history, seeded_policies, InMemoryHistoryStore, InMemoryPolicyStore, RecordingAuditSink,
    StaticRateLimiter,
};
use chrono::Utc;
use clap::Args;
use clearance::config::AppConfig;
use clearance::error::AppError;
use clearance::evaluation::{
    AccessRequest, Decision, DeviceDescriptor, NetworkZone, RequestContext, RequesterId,
    ResourceKind, Role, UrgencyTag,
};
use clearance::telemetry;
use clearance::AccessEvaluator;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the recorded audit events as JSON after the walkthrough
    #[arg(long)]
    pub(crate) show_audit: bool,
    /// Override the rate budget utilization reported for every requester
    #[arg(long)]
    pub(crate) utilization: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Requester identifier
    #[arg(long)]
    pub(crate) requester: String,
    /// Role held by the requester
    #[arg(long)]
    pub(crate) role: String,
    /// Resource class being requested
    #[arg(long)]
    pub(crate) resource: String,
    /// Why access is needed (at least five words)
    #[arg(long)]
    pub(crate) rationale: String,
    /// Requested duration in minutes
    #[arg(long, default_value_t = 60)]
    pub(crate) minutes: u32,
    /// Urgency: routine, elevated, or critical
    #[arg(long, default_value = "routine", value_parser = crate::infra::parse_urgency)]
    pub(crate) urgency: UrgencyTag,
    /// Network zone: campus-wired, campus-wifi, vpn, or external
    #[arg(long, default_value = "campus-wifi", value_parser = crate::infra::parse_network)]
    pub(crate) network: NetworkZone,
    /// Treat the submitting device as organization-managed
    #[arg(long)]
    pub(crate) managed_device: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        show_audit,
        utilization,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let utilization = utilization.unwrap_or(0.25);

    let sink = Arc::new(RecordingAuditSink::default());
    let engine = AccessEvaluator::new(
        Arc::new(InMemoryPolicyStore::with(seeded_policies())),
        Arc::new(InMemoryHistoryStore::with(seeded_history())),
        Arc::new(StaticRateLimiter::new(utilization)),
        Arc::clone(&sink),
        config.engine.evaluation_config(),
    );

    info!(?config.environment, "clearance console ready");

    println!("Access evaluation demo");
    for request in demo_requests() {
        println!(
            "\n{} ({}) requesting {} for {} minutes, {} urgency, via {}",
            request.requester,
            request.role,
            request.resource,
            request.requested_minutes,
            request.urgency.label(),
            request.context.network.label()
        );
        println!("  Rationale: {}", request.rationale);

        let decision = match engine.evaluate(request).await {
            Ok(decision) => decision,
            Err(err) => {
                println!("  Request rejected before evaluation: {}", err);
                continue;
            }
        };

        render_decision(&decision, "  ");
    }

    if show_audit {
        println!("\nAudit trail");
        for event in sink.events() {
            match serde_json::to_string_pretty(&event) {
                Ok(json) => println!("{json}"),
                Err(err) => println!("  Audit payload unavailable: {}", err),
            }
        }
    }

    Ok(())
}

pub(crate) async fn run_evaluation(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        requester,
        role,
        resource,
        rationale,
        minutes,
        urgency,
        network,
        managed_device,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let sink = Arc::new(RecordingAuditSink::default());
    let engine = AccessEvaluator::new(
        Arc::new(InMemoryPolicyStore::with(seeded_policies())),
        Arc::new(InMemoryHistoryStore::with(seeded_history())),
        Arc::new(StaticRateLimiter::new(0.25)),
        Arc::clone(&sink),
        config.engine.evaluation_config(),
    );

    info!(?config.environment, "clearance console ready");

    let request = AccessRequest {
        requester: RequesterId(requester),
        role: Role(role),
        resource: ResourceKind(resource),
        rationale,
        requested_minutes: minutes,
        urgency,
        submitted_at: Utc::now(),
        context: RequestContext {
            network,
            device: DeviceDescriptor {
                identifier: "console".to_string(),
                platform: std::env::consts::OS.to_string(),
                managed: managed_device,
            },
        },
    };

    let decision = engine.evaluate(request).await?;
    render_decision(&decision, "");

    for event in sink.events() {
        match serde_json::to_string_pretty(&event) {
            Ok(json) => println!("Audit event:\n{json}"),
            Err(err) => println!("Audit payload unavailable: {}", err),
        }
    }

    Ok(())
}

fn render_decision(decision: &Decision, indent: &str) {
    println!("{indent}Decision: {}", decision.summary());
    if let Some(reason) = decision.denial_reason {
        println!("{indent}Denial code: {}", reason.code());
    }
    println!("{indent}Confidence components:");
    for (factor, score) in decision.breakdown.components() {
        println!(
            "{indent}  - {}: {:.1} (weight {:.2})",
            factor.label(),
            score,
            factor.weight()
        );
    }
    if decision.evaluated_policies.is_empty() {
        println!("{indent}Policies consulted: none");
    } else {
        let ids: Vec<&str> = decision.evaluated_policies.iter().map(|id| id.0.as_str()).collect();
        println!("{indent}Policies consulted: {}", ids.join(", "));
    }
}

fn demo_requests() -> Vec<AccessRequest> {
    vec![
        // first-time thesis request: expect a verification grant
        demo_request(
            "stu-2204",
            "student",
            "library_database",
            "I need this database for my thesis research on neural networks",
            120,
            UrgencyTag::Routine,
            campus_context(NetworkZone::CampusWifi, true),
        ),
        // trusted faculty requester with a clear purpose
        demo_request(
            "fac-0917",
            "faculty",
            "research_archive",
            "Preparing approved coursework materials for my research seminar presentation scheduled this week",
            240,
            UrgencyTag::Routine,
            campus_context(NetworkZone::CampusWired, true),
        ),
        // role outside every policy for the resource
        demo_request(
            "stu-2204",
            "student",
            "admin_panel",
            "I want to review the admin panel settings for my coursework",
            30,
            UrgencyTag::Elevated,
            campus_context(NetworkZone::CampusWifi, true),
        ),
        // suspicious short rationale from an unmanaged external device
        demo_request(
            "ext-5530",
            "contractor",
            "library_database",
            "just doing a quick test",
            15,
            UrgencyTag::Critical,
            campus_context(NetworkZone::External, false),
        ),
        // resource no policy governs
        demo_request(
            "stu-2204",
            "student",
            "telescope_scheduler",
            "observing run data for my dissertation",
            60,
            UrgencyTag::Routine,
            campus_context(NetworkZone::Vpn, true),
        ),
        // too terse to evaluate at all
        demo_request(
            "stu-2204",
            "student",
            "library_database",
            "need it now",
            10,
            UrgencyTag::Critical,
            campus_context(NetworkZone::CampusWifi, true),
        ),
    ]
}

fn demo_request(
    requester: &str,
    role: &str,
    resource: &str,
    rationale: &str,
    minutes: u32,
    urgency: UrgencyTag,
    context: RequestContext,
) -> AccessRequest {
    AccessRequest {
        requester: RequesterId(requester.to_string()),
        role: Role(role.to_string()),
        resource: ResourceKind(resource.to_string()),
        rationale: rationale.to_string(),
        requested_minutes: minutes,
        urgency,
        submitted_at: Utc::now(),
        context,
    }
}

fn campus_context(network: NetworkZone, managed: bool) -> RequestContext {
    RequestContext {
        network,
        device: DeviceDescriptor {
            identifier: "demo-device".to_string(),
            platform: "linux".to_string(),
            managed,
        },
    }
}
