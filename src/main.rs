use axum::routing::{delete, get, post};
use axum::Router;
use event_engine::clock::{SharedClock, SystemClock};
use event_engine::config::AppConfig;
use event_engine::gateways::mock::MockGateway;
use event_engine::gateways::xendit::XenditGateway;
use event_engine::gateways::PaymentGateway;
use event_engine::http::handlers::{attendance, certificates, events, payments, registrations, webhooks};
use event_engine::repo::certificates_repo::CertificatesRepo;
use event_engine::repo::events_repo::EventsRepo;
use event_engine::repo::participants_repo::ParticipantsRepo;
use event_engine::repo::payments_repo::PaymentsRepo;
use event_engine::service::attendance_service::AttendanceService;
use event_engine::service::callback_service::CallbackService;
use event_engine::service::certificate_service::CertificateService;
use event_engine::service::events_service::EventsService;
use event_engine::service::payment_service::PaymentService;
use event_engine::service::registration_service::RegistrationService;
use event_engine::storage::{LocalArtifactStore, PlaceholderPdfRenderer};
use event_engine::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let clock: SharedClock = Arc::new(SystemClock);
    let events_repo = EventsRepo { pool: pool.clone() };
    let participants_repo = ParticipantsRepo { pool: pool.clone() };
    let payments_repo = PaymentsRepo { pool: pool.clone() };
    let certificates_repo = CertificatesRepo { pool: pool.clone() };

    let gateway: Arc<dyn PaymentGateway> = if cfg.use_mock_gateway {
        Arc::new(MockGateway {
            behavior: "ALWAYS_SUCCESS".to_string(),
        })
    } else {
        Arc::new(XenditGateway {
            base_url: cfg.gateway_base_url.clone(),
            api_key: cfg.gateway_api_key.clone(),
            timeout_ms: cfg.gateway_timeout_ms,
            client: reqwest::Client::new(),
        })
    };

    let state = AppState {
        events_service: EventsService {
            events_repo: events_repo.clone(),
            participants_repo: participants_repo.clone(),
            clock: clock.clone(),
        },
        registration_service: RegistrationService {
            pool: pool.clone(),
            events_repo: events_repo.clone(),
            clock: clock.clone(),
        },
        payment_service: PaymentService {
            pool: pool.clone(),
            events_repo: events_repo.clone(),
            payments_repo,
            gateway,
            clock: clock.clone(),
            payment_ttl_hours: cfg.payment_ttl_hours,
        },
        callback_service: CallbackService {
            pool: pool.clone(),
            events_repo: events_repo.clone(),
            clock: clock.clone(),
        },
        attendance_service: AttendanceService {
            events_repo: events_repo.clone(),
            participants_repo: participants_repo.clone(),
            clock: clock.clone(),
        },
        certificate_service: CertificateService {
            pool: pool.clone(),
            events_repo,
            participants_repo,
            certificates_repo,
            store: Arc::new(LocalArtifactStore {
                root: cfg.artifact_root.clone().into(),
            }),
            renderer: Arc::new(PlaceholderPdfRenderer),
            clock,
        },
    };

    let app = Router::new()
        .route("/health", get(events::health))
        .route("/events", post(events::create_event))
        .route("/events/:id", get(events::get_event))
        .route("/events/:id", delete(events::delete_event))
        .route("/events/:id/register", post(registrations::register))
        .route("/events/:id/checkout", post(payments::checkout))
        .route("/events/:id/attendance/verify", post(attendance::verify))
        .route("/events/:id/certificates", post(certificates::issue_all))
        .route(
            "/events/:id/participants/:user_id/certificate",
            post(certificates::issue),
        )
        .route("/certificates/:id/download", post(certificates::download))
        .route("/payments/:id/approve", post(payments::approve))
        .route("/webhooks/payments", post(webhooks::payment_callback))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!(addr = %cfg.bind_addr, "event engine listening");
    axum::serve(listener, app).await?;

    Ok(())
}
