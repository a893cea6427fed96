use serde::Serialize;
use thiserror::Error;

use crate::schema::{pizzas, restaurant_pizzas, restaurants};

pub const MIN_PRICE: f64 = 1.0;
pub const MAX_PRICE: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Identifiable)]
#[table_name = "restaurants"]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Identifiable)]
#[table_name = "pizzas"]
pub struct Pizza {
    pub id: i32,
    pub name: String,
    pub ingredients: String,
}

/// Priced link between a restaurant and a pizza it sells.
#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Identifiable, Associations)]
#[belongs_to(Restaurant)]
#[belongs_to(Pizza)]
#[table_name = "restaurant_pizzas"]
pub struct RestaurantPizza {
    pub id: i32,
    pub price: f64,
    pub pizza_id: i32,
    pub restaurant_id: i32,
}

#[derive(Debug, Insertable)]
#[table_name = "restaurants"]
pub struct NewRestaurant<'a> {
    pub name: &'a str,
    pub address: &'a str,
}

#[derive(Debug, Insertable)]
#[table_name = "pizzas"]
pub struct NewPizza<'a> {
    pub name: &'a str,
    pub ingredients: &'a str,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[table_name = "restaurant_pizzas"]
pub struct NewRestaurantPizza {
    pub price: f64,
    pub pizza_id: i32,
    pub restaurant_id: i32,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("price is missing")]
    Missing,
    #[error("price is not a number")]
    NotANumber,
    #[error("price {0} must be between 1 and 30")]
    OutOfRange(f64),
}

/// Checks a price against the inclusive [1, 30] range. NaN and infinities
/// never pass.
pub fn validate_price(price: f64) -> Result<f64, PriceError> {
    if (MIN_PRICE..=MAX_PRICE).contains(&price) {
        Ok(price)
    } else {
        Err(PriceError::OutOfRange(price))
    }
}
