use std::future;

use quake_ledger::{config, database, graphql};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    println!("Started version {}", env!("CARGO_PKG_VERSION"));
    tracing_subscriber::fmt::init();

    let config = config::get().await.expect("Config read failed");

    let conn = database::connect(&config.database_url).await.expect("Database connection failed");
    database::init(&conn).await.expect("Database initialization failed");

    let schema = graphql::build_schema(conn);
    let app = graphql::router(schema, config.playground);

    let address = config.address();
    let listener = TcpListener::bind(&address).await.expect("Listener bind failed");
    info!("Server ready at http://{address}/graphql");

    if let Err(err) = axum::serve(listener, app).with_graceful_shutdown(shutdown()).await {
        error!("Server error: {err}");
    }
}

async fn shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(err) => {
            error!("Unable to listen for shutdown signal: {err}");
            future::pending::<()>().await;
        }
    }
}
