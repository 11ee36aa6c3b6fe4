use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tracing::info;

use loandesk::config::AppConfig;
use loandesk::error::AppError;
use loandesk::telemetry;
use loandesk::workflows::loans::{
    loan_router, ApplicationId, ApplicationStatus, CreditLine, CreditReport, EmploymentStatus,
    FixedReferenceIncome, InMemoryCreditBureau, InMemoryRepository, LoanApplication,
    LoanApplicationService, RiskConfig, RiskEngine, RiskEvaluation, SamplingVerifier, UserId,
};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "loandesk",
    about = "Run the loan application lifecycle and risk assessment service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a hypothetical application on the command line
    Assess(AssessArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct AssessArgs {
    /// Requested principal
    #[arg(long)]
    amount: f64,
    /// Term in months
    #[arg(long)]
    term_months: u32,
    /// Declared gross monthly income
    #[arg(long)]
    income_monthly: f64,
    /// Existing monthly obligations from the credit report
    #[arg(long, default_value_t = 0.0)]
    obligations: f64,
    /// Bureau credit score
    #[arg(long)]
    credit_score: u16,
    /// Declared existing debts
    #[arg(long, default_value_t = 0.0)]
    existing_debts: f64,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Assess(args) => run_assessment(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let repository = Arc::new(InMemoryRepository::default());
    let bureau = Arc::new(InMemoryCreditBureau::with_reports(demo_credit_reports()));
    let verifier = Arc::new(SamplingVerifier::default());
    let reference_income = Arc::new(FixedReferenceIncome(4500.0));
    let service = Arc::new(LoanApplicationService::new(
        repository,
        bureau,
        verifier,
        reference_income,
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(loan_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan workflow service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_assessment(args: AssessArgs) -> Result<(), AppError> {
    let engine = RiskEngine::new(RiskConfig::default());
    let now = Utc::now();
    let user_id = UserId("cli".to_string());

    let application = LoanApplication {
        id: ApplicationId("cli-demo".to_string()),
        user_id: user_id.clone(),
        applicant_name: "CLI Demo".to_string(),
        email: "demo@example.com".to_string(),
        phone: String::new(),
        loan_amount: args.amount,
        loan_purpose: "demo".to_string(),
        loan_term_months: args.term_months,
        employment_status: EmploymentStatus::Employed,
        income_monthly: args.income_monthly,
        existing_debts: args.existing_debts,
        credit_score: Some(args.credit_score),
        status: ApplicationStatus::Submitted,
        documents: Vec::new(),
        assessment: RiskEvaluation::Pending,
        screening: None,
        created_at: now,
        updated_at: now,
    };
    let report = CreditReport {
        user_id,
        score: args.credit_score,
        total_debts: args.existing_debts,
        monthly_obligations: args.obligations,
        history: Vec::new(),
    };

    let assessment = engine.assess(&application, &report);
    match serde_json::to_string_pretty(&assessment) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("risk assessment payload unavailable: {err}"),
    }
    Ok(())
}

/// Bureau seed so the dev server can score the demo applicant out of the box.
fn demo_credit_reports() -> Vec<CreditReport> {
    vec![CreditReport {
        user_id: UserId("2".to_string()),
        score: 720,
        total_debts: 10_000.0,
        monthly_obligations: 500.0,
        history: vec![
            CreditLine {
                loan_type: "Credit Card".to_string(),
                status: "Good Standing".to_string(),
                amount: 5_000.0,
                start_date: NaiveDate::from_ymd_opt(2020, 3, 15).expect("valid date"),
                end_date: None,
            },
            CreditLine {
                loan_type: "Auto Loan".to_string(),
                status: "Paid Off".to_string(),
                amount: 15_000.0,
                start_date: NaiveDate::from_ymd_opt(2018, 5, 10).expect("valid date"),
                end_date: NaiveDate::from_ymd_opt(2021, 5, 10),
            },
        ],
    }]
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
