//! Headless realtime client: opens a session for the configured user and
//! logs live notification and seat updates until Ctrl-C.

use std::sync::Arc;

use tracing_subscriber::prelude::*;

use skybook_realtime::adapters::events::InMemoryBroadcastBus;
use skybook_realtime::adapters::http::{RestClient, RestConfig};
use skybook_realtime::adapters::websocket::TungstenitePushConnector;
use skybook_realtime::application::{FlightListView, RealtimeSession, SessionPorts};
use skybook_realtime::config::{AppConfig, LogFormat, LoggingConfig, ValidationError};
use skybook_realtime::ports::{handler_fn, BroadcastEvent, BroadcastSubscriber, Topic};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging);

    let token = config
        .api
        .session_token
        .clone()
        .ok_or(ValidationError::MissingRequired("api.session_token"))?;

    let rest = Arc::new(RestClient::new(
        RestConfig::new(&config.api.base_url, token.clone()).with_timeout(config.api.timeout()),
    )?);
    let connector = TungstenitePushConnector::new(&config.api.base_url)
        .with_path(&config.realtime.push_path);
    let bus = Arc::new(InMemoryBroadcastBus::new());

    let mut session = RealtimeSession::start(
        &config.realtime,
        token,
        SessionPorts {
            notifications: rest.clone(),
            connector: Arc::new(connector),
            bus: bus.clone(),
        },
    )
    .await;

    let dashboard = Arc::new(FlightListView::new("dashboard"));
    if let Err(e) = dashboard.load(rest.as_ref()).await {
        tracing::warn!(error = %e, "Company flights unavailable; seat updates will still be logged");
    }
    let _dashboard_sub = bus.subscribe(Topic::FlightSeats, dashboard.clone());
    let _log_sub = bus.subscribe(
        Topic::FlightSeats,
        handler_fn("seat-log", |event| match event {
            BroadcastEvent::FlightSeats(snapshot) => tracing::info!(
                flight_id = %snapshot.flight_id,
                seats_available = snapshot.seats_available,
                "Seats changed"
            ),
        }),
    );

    let mut unread = session.reconciler().subscribe_unread();
    let unread_log = tokio::spawn(async move {
        while unread.changed().await.is_ok() {
            let count = *unread.borrow_and_update();
            tracing::info!(unread = count, "Unread notifications");
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    session.shutdown();
    unread_log.abort();
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(env_filter);
    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
