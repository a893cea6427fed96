//! Request and response shapes for the HTTP layer. Each endpoint picks its
//! shape explicitly; stored rows never decide what gets nested.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{validate_price, Pizza, PriceError, Restaurant, RestaurantPizza};

/// GET /restaurants/{id}
#[derive(Debug, Serialize)]
pub struct RestaurantDetail {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub restaurant_pizzas: Vec<RestaurantPizza>,
}

impl RestaurantDetail {
    pub fn new(restaurant: Restaurant, restaurant_pizzas: Vec<RestaurantPizza>) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name,
            address: restaurant.address,
            restaurant_pizzas,
        }
    }
}

/// POST /restaurant_pizzas
#[derive(Debug, Serialize)]
pub struct RestaurantPizzaDetail {
    pub id: i32,
    pub price: f64,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: Pizza,
    pub restaurant: Restaurant,
}

impl RestaurantPizzaDetail {
    pub fn new(link: RestaurantPizza, pizza: Pizza, restaurant: Restaurant) -> Self {
        Self {
            id: link.id,
            price: link.price,
            pizza_id: link.pizza_id,
            restaurant_id: link.restaurant_id,
            pizza,
            restaurant,
        }
    }
}

/// Body of POST /restaurant_pizzas. Only a JSON object is accepted; its
/// fields stay loosely typed so that every malformed value ends up as the
/// same validation error.
#[derive(Debug, Default)]
pub struct CreateRestaurantPizza {
    pub price: Option<Value>,
    pub pizza_id: Option<Value>,
    pub restaurant_id: Option<Value>,
}

impl From<Map<String, Value>> for CreateRestaurantPizza {
    fn from(mut body: Map<String, Value>) -> Self {
        Self {
            price: body.remove("price"),
            pizza_id: body.remove("pizza_id"),
            restaurant_id: body.remove("restaurant_id"),
        }
    }
}

/// Numbers, numeric strings and booleans (as 1 or 0) are accepted, then range
/// checked.
pub fn parse_price(value: Option<&Value>) -> Result<f64, PriceError> {
    let price = match value {
        None | Some(Value::Null) => return Err(PriceError::Missing),
        Some(Value::Number(n)) => n.as_f64().ok_or(PriceError::NotANumber)?,
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| PriceError::NotANumber)?,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(_) => return Err(PriceError::NotANumber),
    };
    validate_price(price)
}

/// Integers, integral floats (`1.0`), integer strings and booleans (as 1 or 0).
pub fn parse_id(value: Option<&Value>) -> Option<i32> {
    match value? {
        Value::Number(n) => match n.as_i64() {
            Some(v) => i32::try_from(v).ok(),
            None => n.as_f64().filter(|v| is_i32(*v)).map(|v| v as i32),
        },
        Value::String(s) => s.trim().parse::<i32>().ok(),
        Value::Bool(b) => Some(i32::from(*b)),
        _ => None,
    }
}

fn is_i32(v: f64) -> bool {
    v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX)
}
