use std::{io::Read, path::Path};

use sea_orm::{ActiveValue, ConnectionTrait, DbErr, EntityTrait, TransactionTrait};
use tokio::fs;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{database::earthquake, resolver::validate};

const BATCH_SIZE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid row at line {line}: {reason}")]
    Row { line: u64, reason: String },
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "Latitude")]
    latitude: String,
    #[serde(rename = "Longitude")]
    longitude: String,
    #[serde(rename = "Magnitude")]
    magnitude: String,
    #[serde(rename = "DateTime")]
    date_time: String,
}

impl Row {
    fn into_active_model(self, line: u64) -> Result<earthquake::ActiveModel, Error> {
        let magnitude = self
            .magnitude
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::Row { line, reason: format!("invalid magnitude {:?}: {e}", self.magnitude) })?;
        let date = validate::parse_date(&self.date_time)
            .ok_or_else(|| Error::Row { line, reason: format!("invalid date {:?}", self.date_time) })?;

        Ok(earthquake::ActiveModel {
            location: ActiveValue::Set(format!("{}, {}", self.latitude.trim(), self.longitude.trim())),
            magnitude: ActiveValue::Set(magnitude),
            date: ActiveValue::Set(validate::to_iso(date)),
            ..Default::default()
        })
    }
}

/// imports earthquakes from a CSV with `Latitude`, `Longitude`, `Magnitude` and `DateTime` columns
///
/// every row is converted before anything is written, and the batches share one transaction,
/// so a failed import leaves the store untouched
pub async fn import<C, R>(conn: &C, reader: R) -> Result<usize, Error>
where
    C: ConnectionTrait + TransactionTrait,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut models = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row = record.deserialize::<Row>(Some(&headers))?;
        models.push(row.into_active_model(line)?);
    }

    let txn = conn.begin().await?;
    let mut count = 0;
    for chunk in models.chunks(BATCH_SIZE) {
        count += flush(&txn, chunk).await?;
    }
    txn.commit().await?;

    info!("Imported {count} earthquakes");
    Ok(count)
}

pub async fn import_file<C>(conn: &C, path: &Path) -> Result<usize, Error>
where
    C: ConnectionTrait + TransactionTrait,
{
    let content = fs::read(path).await?;
    info!("Importing earthquakes from {}", path.display());
    import(conn, content.as_slice()).await
}

async fn flush<C: ConnectionTrait>(conn: &C, batch: &[earthquake::ActiveModel]) -> Result<usize, DbErr> {
    let len = batch.len();
    earthquake::Entity::insert_many(batch.iter().cloned()).exec(conn).await?;
    debug!("Inserted batch of {len} earthquakes");
    Ok(len)
}
