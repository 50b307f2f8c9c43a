use sea_orm::{
    ActiveModelTrait, ActiveValue, Condition, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::{debug, info};

use crate::database::earthquake;

mod filter;
mod pagination;
mod sort;
pub mod validate;

pub use filter::Filter;
pub use pagination::{Pagination, MAX_PAGE_SIZE};
pub use sort::{Sort, SortField, SortOrder};
pub use validate::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Earthquake with ID {0} not found")]
    NotFound(i32),
    #[error("Database error: {0}")]
    Internal(#[from] DbErr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub data: Vec<earthquake::Model>,
    pub total: u64,
    pub page: i32,
    pub page_size: i32,
    pub total_pages: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewEarthquake {
    pub location: String,
    pub magnitude: f64,
    pub date: Option<String>,
}

/// fields left to `None` are not touched
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EarthquakePatch {
    pub location: Option<String>,
    pub magnitude: Option<f64>,
    pub date: Option<String>,
}

impl EarthquakePatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(magnitude) = self.magnitude {
            validate::magnitude(magnitude)?;
        }
        if let Some(date) = &self.date {
            validate::date(date)?;
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.location.is_none() && self.magnitude.is_none() && self.date.is_none()
    }
}

/// a page of earthquakes matching `filter`, plus the total count of matches
pub async fn list<C>(conn: &C, pagination: Pagination, sort: Option<Sort>, filter: Option<&Filter>) -> Result<Page, Error>
where
    C: ConnectionTrait,
{
    debug!("Listing earthquakes {pagination:?} {sort:?} {filter:?}");

    let condition = filter.map(Filter::condition).unwrap_or_else(Condition::all);

    let total = earthquake::Entity::find().filter(condition.clone()).count(conn).await?;

    let (column, order) = sort.unwrap_or_default().order_by();
    let data = earthquake::Entity::find()
        .filter(condition)
        .order_by(column, order)
        .order_by_asc(earthquake::Column::Id)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(conn)
        .await?;

    Ok(Page {
        data,
        total,
        page: pagination.page(),
        page_size: pagination.page_size(),
        total_pages: pagination.total_pages(total),
    })
}

pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> Result<earthquake::Model, Error> {
    earthquake::Entity::find_by_id(id).one(conn).await?.ok_or(Error::NotFound(id))
}

pub async fn create<C: ConnectionTrait>(conn: &C, input: NewEarthquake) -> Result<earthquake::Model, Error> {
    let NewEarthquake { location, magnitude, date } = input;

    validate::magnitude(magnitude)?;
    let date = match date.filter(|date| !date.is_empty()) {
        Some(date) => {
            validate::date(&date)?;
            date
        }
        None => validate::now(),
    };

    let model = earthquake::ActiveModel {
        location: ActiveValue::Set(location),
        magnitude: ActiveValue::Set(magnitude),
        date: ActiveValue::Set(date),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    info!("Created earthquake {}", model.id);
    Ok(model)
}

/// lookup and write share one transaction
pub async fn update<C>(conn: &C, id: i32, patch: EarthquakePatch) -> Result<earthquake::Model, Error>
where
    C: ConnectionTrait + TransactionTrait,
{
    patch.validate()?;

    let txn = conn.begin().await?;
    match apply(&txn, id, patch).await {
        Ok(model) => {
            txn.commit().await?;
            info!("Updated earthquake {id}");
            Ok(model)
        }
        Err(err) => {
            txn.rollback().await?;
            Err(err)
        }
    }
}

async fn apply<C: ConnectionTrait>(conn: &C, id: i32, patch: EarthquakePatch) -> Result<earthquake::Model, Error> {
    let model = get(conn, id).await?;
    if patch.is_empty() {
        return Ok(model);
    }

    let EarthquakePatch { location, magnitude, date } = patch;
    let mut am = model.into_active_model();
    if let Some(location) = location {
        am.location = ActiveValue::Set(location);
    }
    if let Some(magnitude) = magnitude {
        am.magnitude = ActiveValue::Set(magnitude);
    }
    if let Some(date) = date {
        am.date = ActiveValue::Set(date);
    }

    // a concurrent delete can still win before the write takes the lock
    am.update(conn).await.map_err(|err| match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => Error::NotFound(id),
        err => Error::Internal(err),
    })
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bool, Error> {
    let res = earthquake::Entity::delete_by_id(id).exec(conn).await?;
    if res.rows_affected == 0 {
        return Err(Error::NotFound(id));
    }

    info!("Deleted earthquake {id}");
    Ok(true)
}
