use actix_web::{delete, get, post, web, HttpResponse};
use serde_json::{Map, Value};

use crate::db::DbPool;
use crate::dto::{
    parse_id, parse_price, CreateRestaurantPizza, RestaurantDetail, RestaurantPizzaDetail,
};
use crate::error::ApiError;
use crate::models::NewRestaurantPizza;
use crate::query;

const INDEX_HTML: &str = "<h1>Pizza Restaurants API</h1>";

#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[get("/restaurants")]
async fn get_restaurants(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let restaurants = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        Ok(query::find_all_restaurants(&conn)?)
    })
    .await??;
    Ok(HttpResponse::Ok().json(restaurants))
}

#[get("/restaurants/{id}")]
async fn get_restaurant(
    restaurant_id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let restaurant_id = restaurant_id.into_inner();
    let detail = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        let (restaurant, links) = query::find_restaurant_with_pizzas(restaurant_id, &conn)?
            .ok_or(ApiError::RestaurantNotFound)?;
        Ok(RestaurantDetail::new(restaurant, links))
    })
    .await??;
    Ok(HttpResponse::Ok().json(detail))
}

#[delete("/restaurants/{id}")]
async fn delete_restaurant(
    restaurant_id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let restaurant_id = restaurant_id.into_inner();
    web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        query::delete_restaurant(restaurant_id, &conn)
            .map_err(|e| ApiError::from_store(e, ApiError::RestaurantNotFound))
    })
    .await??;
    log::info!("deleted restaurant {}", restaurant_id);
    Ok(HttpResponse::NoContent().finish())
}

#[get("/pizzas")]
async fn get_pizzas(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let pizzas = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        Ok(query::find_all_pizzas(&conn)?)
    })
    .await??;
    Ok(HttpResponse::Ok().json(pizzas))
}

#[post("/restaurant_pizzas")]
async fn create_restaurant_pizza(
    body: web::Json<Map<String, Value>>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let body = CreateRestaurantPizza::from(body.into_inner());
    let price = parse_price(body.price.as_ref()).map_err(|e| {
        log::debug!("rejected restaurant_pizza: {}", e);
        ApiError::Validation
    })?;
    let pizza_id = parse_id(body.pizza_id.as_ref()).ok_or(ApiError::Validation)?;
    let restaurant_id = parse_id(body.restaurant_id.as_ref()).ok_or(ApiError::Validation)?;

    let created = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        let restaurant = query::find_restaurant(restaurant_id, &conn)?;
        let pizza = query::find_pizza(pizza_id, &conn)?;
        let (restaurant, pizza) = match (restaurant, pizza) {
            (Some(r), Some(p)) => (r, p),
            _ => {
                log::debug!(
                    "rejected restaurant_pizza: restaurant {} or pizza {} does not exist",
                    restaurant_id,
                    pizza_id
                );
                return Err(ApiError::Validation);
            }
        };
        let new = NewRestaurantPizza {
            price,
            pizza_id,
            restaurant_id,
        };
        // a failed write is reported like any other bad input
        let link = query::create_restaurant_pizza(new, &conn).map_err(|e| {
            log::warn!("restaurant_pizza insert rolled back: {}", e);
            ApiError::Validation
        })?;
        Ok(RestaurantPizzaDetail::new(link, pizza, restaurant))
    })
    .await??;
    Ok(HttpResponse::Created().json(created))
}

/// Registers every route plus the JSON extractor settings.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("rejected request body: {}", err);
        ApiError::Validation.into()
    });

    cfg.app_data(json_config)
        .service(index)
        .service(get_restaurants)
        .service(get_restaurant)
        .service(delete_restaurant)
        .service(get_pizzas)
        .service(create_restaurant_pizza);
}
