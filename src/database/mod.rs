use sea_orm::{
    sea_query::Index, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema,
};
use tracing::debug;

pub mod earthquake;

/// opens the store behind `url`
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url);
    // every in-memory connection is a distinct database, keep a single one alive
    if url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    Database::connect(options).await
}

/// creates the earthquakes table and its indexes, if missing
pub async fn init<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(earthquake::Entity);
    table.if_not_exists();
    conn.execute(backend.build(&table)).await?;

    for (name, column) in [
        ("idx_earthquakes_location", earthquake::Column::Location),
        ("idx_earthquakes_magnitude", earthquake::Column::Magnitude),
        ("idx_earthquakes_date", earthquake::Column::Date),
    ] {
        let index = Index::create().if_not_exists().name(name).table(earthquake::Entity).col(column).to_owned();
        conn.execute(backend.build(&index)).await?;
    }

    debug!("Database schema ready");
    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory() -> DatabaseConnection {
    let conn = connect("sqlite::memory:").await.unwrap();
    init(&conn).await.unwrap();
    conn
}
