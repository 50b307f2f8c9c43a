use sea_orm::sea_query::Order;

use crate::database::earthquake::Column;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortField {
    Date,
    Magnitude,
    Location,
}

impl SortField {
    fn column(&self) -> Column {
        match self {
            SortField::Date => Column::Date,
            SortField::Magnitude => Column::Magnitude,
            SortField::Location => Column::Location,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// ordering of a listing, newest first unless asked otherwise
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for Sort {
    fn default() -> Self {
        Sort { field: SortField::Date, order: SortOrder::Desc }
    }
}

impl Sort {
    pub fn order_by(&self) -> (Column, Order) {
        (self.field.column(), self.order.into())
    }
}
