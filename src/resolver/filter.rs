use sea_orm::{sea_query::Expr, ColumnTrait, Condition, Value};

use crate::database::earthquake::Column;

/// matches `search` as a prefix of the trimmed text on either side of the first comma in `location`
const SEARCH_EXPR: &str = "(SUBSTR(TRIM(SUBSTR(location, 1, INSTR(location, ',') - 1)), 1, ?) = ? \
OR SUBSTR(TRIM(SUBSTR(location, INSTR(location, ',') + 1)), 1, ?) = ?)";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    pub search: Option<String>,
    pub min_magnitude: Option<f64>,
    pub max_magnitude: Option<f64>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl Filter {
    /// every present field adds one predicate, all of them must hold
    pub fn condition(&self) -> Condition {
        let Filter { search, min_magnitude, max_magnitude, from_date, to_date } = self;

        Condition::all()
            .add_option(search.as_deref().filter(|s| !s.is_empty()).map(|search| {
                let len = Value::from(search.chars().count() as i64);
                let search = Value::from(search);
                Expr::cust_with_values(SEARCH_EXPR, [len.clone(), search.clone(), len, search])
            }))
            .add_option(min_magnitude.map(|min| Column::Magnitude.gte(min)))
            .add_option(max_magnitude.map(|max| Column::Magnitude.lte(max)))
            .add_option(from_date.as_deref().filter(|s| !s.is_empty()).map(|from| Column::Date.gte(from)))
            .add_option(to_date.as_deref().filter(|s| !s.is_empty()).map(|to| Column::Date.lte(to)))
    }
}
