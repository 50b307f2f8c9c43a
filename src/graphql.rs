//! GraphQL surface over the earthquake resolvers
//!
//! The schema carries the database connection as context data, every resolver
//! maps the outcome of the matching [`resolver`] operation onto GraphQL errors
//! tagged with an extension `code`.

use async_graphql::{
    http::{playground_source, GraphQLPlaygroundConfig},
    Context, EmptySubscription, Enum, ErrorExtensions, InputObject, MaybeUndefined, Object, Schema, SimpleObject,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::{
    database::earthquake,
    resolver::{self, EarthquakePatch, Filter, NewEarthquake, Pagination, Sort, ValidationError},
};

pub type EarthquakeSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(conn: DatabaseConnection) -> EarthquakeSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription).data(conn).finish()
}

/// `/graphql` endpoint, answering GET with the playground when enabled
pub fn router(schema: EarthquakeSchema, playground: bool) -> Router {
    let route = if playground { get(graphql_playground).post(graphql_handler) } else { post(graphql_handler) };
    Router::new().route("/graphql", route).layer(CorsLayer::permissive()).with_state(schema)
}

async fn graphql_handler(State(schema): State<EarthquakeSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

fn into_graphql(err: resolver::Error, failure: &str) -> async_graphql::Error {
    let (message, code) = match &err {
        resolver::Error::Validation(_) => (err.to_string(), "BAD_USER_INPUT"),
        resolver::Error::NotFound(_) => (err.to_string(), "NOT_FOUND"),
        resolver::Error::Internal(db_err) => {
            error!("{failure}: {db_err}");
            (failure.to_owned(), "INTERNAL_SERVER_ERROR")
        }
    };
    async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Enum)]
pub enum SortField {
    Date,
    Magnitude,
    Location,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Enum)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, InputObject)]
pub struct SortInput {
    pub field: SortField,
    pub order: SortOrder,
}

impl From<SortInput> for Sort {
    fn from(SortInput { field, order }: SortInput) -> Self {
        Sort {
            field: match field {
                SortField::Date => resolver::SortField::Date,
                SortField::Magnitude => resolver::SortField::Magnitude,
                SortField::Location => resolver::SortField::Location,
            },
            order: match order {
                SortOrder::Asc => resolver::SortOrder::Asc,
                SortOrder::Desc => resolver::SortOrder::Desc,
            },
        }
    }
}

#[derive(Debug, Default, InputObject)]
pub struct FilterInput {
    pub search: Option<String>,
    pub min_magnitude: Option<f64>,
    pub max_magnitude: Option<f64>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl From<FilterInput> for Filter {
    fn from(FilterInput { search, min_magnitude, max_magnitude, from_date, to_date }: FilterInput) -> Self {
        Filter { search, min_magnitude, max_magnitude, from_date, to_date }
    }
}

#[derive(Debug, InputObject)]
pub struct CreateEarthquakeInput {
    pub location: String,
    pub magnitude: f64,
    pub date: Option<String>,
}

impl From<CreateEarthquakeInput> for NewEarthquake {
    fn from(CreateEarthquakeInput { location, magnitude, date }: CreateEarthquakeInput) -> Self {
        NewEarthquake { location, magnitude, date }
    }
}

#[derive(Debug, InputObject)]
pub struct UpdateEarthquakeInput {
    pub location: MaybeUndefined<String>,
    pub magnitude: MaybeUndefined<f64>,
    pub date: MaybeUndefined<String>,
}

/// omitted fields are left alone, but every column is required so `null` can't clear one
fn present<T>(value: MaybeUndefined<T>, field: &'static str) -> Result<Option<T>, ValidationError> {
    match value {
        MaybeUndefined::Undefined => Ok(None),
        MaybeUndefined::Null => Err(ValidationError::Null(field)),
        MaybeUndefined::Value(value) => Ok(Some(value)),
    }
}

impl TryFrom<UpdateEarthquakeInput> for EarthquakePatch {
    type Error = ValidationError;

    fn try_from(UpdateEarthquakeInput { location, magnitude, date }: UpdateEarthquakeInput) -> Result<Self, Self::Error> {
        Ok(EarthquakePatch {
            location: present(location, "location")?,
            magnitude: present(magnitude, "magnitude")?,
            date: present(date, "date")?,
        })
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct Earthquake {
    pub id: i32,
    pub location: String,
    pub magnitude: f64,
    pub date: String,
}

impl From<earthquake::Model> for Earthquake {
    fn from(earthquake::Model { id, location, magnitude, date }: earthquake::Model) -> Self {
        Earthquake { id, location, magnitude, date }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct PaginatedEarthquakes {
    pub data: Vec<Earthquake>,
    pub total: u64,
    pub page_size: i32,
    pub page: i32,
    pub total_pages: u64,
}

impl From<resolver::Page> for PaginatedEarthquakes {
    fn from(page: resolver::Page) -> Self {
        PaginatedEarthquakes {
            data: page.data.into_iter().map(Earthquake::from).collect(),
            total: page.total,
            page_size: page.page_size,
            page: page.page,
            total_pages: page.total_pages,
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn earthquakes(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 1)] page: i32,
        #[graphql(default = 10)] page_size: i32,
        sort: Option<SortInput>,
        filter: Option<FilterInput>,
    ) -> async_graphql::Result<PaginatedEarthquakes> {
        let conn = ctx.data::<DatabaseConnection>()?;
        let filter = filter.map(Filter::from);
        resolver::list(conn, Pagination::new(page, page_size), sort.map(Sort::from), filter.as_ref())
            .await
            .map(PaginatedEarthquakes::from)
            .map_err(|err| into_graphql(err, "Failed to fetch earthquakes"))
    }

    async fn earthquake(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<Option<Earthquake>> {
        let conn = ctx.data::<DatabaseConnection>()?;
        resolver::get(conn, id)
            .await
            .map(|model| Some(model.into()))
            .map_err(|err| into_graphql(err, "Failed to fetch earthquake"))
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_earthquake(
        &self,
        ctx: &Context<'_>,
        input: CreateEarthquakeInput,
    ) -> async_graphql::Result<Earthquake> {
        let conn = ctx.data::<DatabaseConnection>()?;
        resolver::create(conn, input.into())
            .await
            .map(Earthquake::from)
            .map_err(|err| into_graphql(err, "Failed to create earthquake"))
    }

    async fn update_earthquake(
        &self,
        ctx: &Context<'_>,
        id: i32,
        input: UpdateEarthquakeInput,
    ) -> async_graphql::Result<Earthquake> {
        let conn = ctx.data::<DatabaseConnection>()?;
        let res = match EarthquakePatch::try_from(input) {
            Ok(patch) => resolver::update(conn, id, patch).await,
            Err(err) => Err(err.into()),
        };
        res.map(Earthquake::from).map_err(|err| into_graphql(err, "Failed to update earthquake"))
    }

    async fn delete_earthquake(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<bool> {
        let conn = ctx.data::<DatabaseConnection>()?;
        resolver::delete(conn, id).await.map_err(|err| into_graphql(err, "Failed to delete earthquake"))
    }
}
