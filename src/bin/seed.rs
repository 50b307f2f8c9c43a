use std::{env, path::PathBuf};

use quake_ledger::{config, database, seed};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/earthquakes1970-2014.csv"));

    let config = config::get().await.expect("Config read failed");

    let conn = database::connect(&config.database_url).await.expect("Database connection failed");
    database::init(&conn).await.expect("Database initialization failed");

    match seed::import_file(&conn, &path).await {
        Ok(count) => println!("Successfully seeded {count} earthquakes"),
        Err(err) => {
            eprintln!("Error seeding database: {err}");
            std::process::exit(1);
        }
    }
}
