use std::sync::Arc;

use actix_web::{App, HttpServer};
use opentelemetry::global;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::runtime::TokioCurrentThread;
use paperclip::actix::{web, OpenApiExt};
use tracing_actix_web::TracingLogger;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use libraryservice::app_config::config_app;
use libraryservice::books_repository::{
    BookRepository, InMemoryBookRepository, PostgresBooksRepository,
};
use libraryservice::reservation_service::ReservationService;
use libraryservice::reservations_repository::{
    InMemoryReservationsRepository, PostgresReservationsRepository, ReservationsRepository,
};
use libraryservice::settings::AppSettings;
use libraryservice::users_repository::{
    InMemoryUsersRepository, PostgresUsersRepository, UserRepository,
};

// Based on https://github.com/LukeMathWalker/tracing-actix-web/blob/main/examples/opentelemetry/src/main.rs#L15
fn init_telemetry() {
    let app_name = "libraryservice";

    // Start a new Jaeger trace pipeline.
    // Spans are exported in batch - recommended setup for a production application.
    global::set_text_map_propagator(TraceContextPropagator::new());
    #[allow(deprecated)]
    let tracer = opentelemetry_jaeger::new_agent_pipeline()
        .with_service_name(app_name)
        .install_batch(TokioCurrentThread)
        .expect("Failed to install OpenTelemetry tracer.");

    // Filter based on level - trace, debug, info, warn, error
    // Tunable via `RUST_LOG` env variable
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info"));
    // Create a `tracing` layer using the Jaeger tracer
    let telemetry = tracing_opentelemetry::layer().with_tracer(tracer);
    // Create a `tracing` layer to emit spans as structured logs to stdout
    let formatting_layer = BunyanFormattingLayer::new(app_name.into(), std::io::stdout);
    // Combined them all together in a `tracing` subscriber
    let subscriber = Registry::default()
        .with(env_filter)
        .with(telemetry)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to install `tracing` subscriber.")
}

#[derive(Clone)]
struct Repositories {
    books: Arc<dyn BookRepository>,
    users: Arc<dyn UserRepository>,
    reservations: Arc<dyn ReservationsRepository>,
}

async fn init_repositories(settings: &AppSettings) -> anyhow::Result<Repositories> {
    if settings.use_in_memory_db {
        tracing::info!("Using in memory repositories");
        return Ok(Repositories {
            books: Arc::new(InMemoryBookRepository::default()),
            users: Arc::new(InMemoryUsersRepository::default()),
            reservations: Arc::new(InMemoryReservationsRepository::default()),
        });
    }

    let postgres_config = settings.postgres_config();
    Ok(Repositories {
        books: Arc::new(PostgresBooksRepository::init(postgres_config.clone()).await?),
        users: Arc::new(PostgresUsersRepository::init(postgres_config.clone()).await?),
        reservations: Arc::new(PostgresReservationsRepository::init(postgres_config).await?),
    })
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry();

    let settings = AppSettings::load()?;
    let repositories = init_repositories(&settings).await?;
    let reservation_service = ReservationService::new(
        repositories.books.clone(),
        repositories.users.clone(),
        repositories.reservations.clone(),
    );

    tracing::info!(
        "starting HTTP server at http://{}:{}",
        settings.http_host,
        settings.http_port
    );

    HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(web::Data::new(repositories.books.clone()))
            .app_data(web::Data::new(repositories.users.clone()))
            .app_data(web::Data::new(repositories.reservations.clone()))
            .app_data(web::Data::new(reservation_service.clone()))
            .wrap(TracingLogger::default())
            .configure(config_app)
            .with_json_spec_at("/apispec/v2")
            .build()
    })
    .bind((settings.http_host.as_str(), settings.http_port))?
    .run()
    .await?;

    global::shutdown_tracer_provider();
    Ok(())
}
