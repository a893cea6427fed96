//! Sample catalog for local development.

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::error::StoreError;
use crate::models::{NewPizza, NewRestaurant, NewRestaurantPizza};
use crate::query;

const RESTAURANTS: &[(&str, &str)] = &[
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const PIZZAS: &[(&str, &str)] = &[
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

/// (restaurant index, pizza index, price)
const LINKS: &[(usize, usize, f64)] = &[(0, 0, 1.0), (1, 1, 4.0), (2, 2, 5.0)];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub restaurants: usize,
    pub pizzas: usize,
    pub restaurant_pizzas: usize,
}

/// Clears every table and inserts the sample catalog in one transaction.
pub fn reseed(conn: &SqliteConnection) -> Result<SeedSummary, StoreError> {
    use crate::schema::{pizzas, restaurant_pizzas, restaurants};

    conn.transaction(|| {
        diesel::delete(restaurant_pizzas::table).execute(conn)?;
        diesel::delete(restaurants::table).execute(conn)?;
        diesel::delete(pizzas::table).execute(conn)?;

        let mut inserted_restaurants = Vec::with_capacity(RESTAURANTS.len());
        for &(name, address) in RESTAURANTS {
            let new = NewRestaurant { name, address };
            inserted_restaurants.push(query::insert_restaurant(&new, conn)?);
        }
        let mut inserted_pizzas = Vec::with_capacity(PIZZAS.len());
        for &(name, ingredients) in PIZZAS {
            let new = NewPizza { name, ingredients };
            inserted_pizzas.push(query::insert_pizza(&new, conn)?);
        }
        for &(r, p, price) in LINKS {
            query::create_restaurant_pizza(
                NewRestaurantPizza {
                    price,
                    pizza_id: inserted_pizzas[p].id,
                    restaurant_id: inserted_restaurants[r].id,
                },
                conn,
            )?;
        }

        Ok(SeedSummary {
            restaurants: inserted_restaurants.len(),
            pizzas: inserted_pizzas.len(),
            restaurant_pizzas: LINKS.len(),
        })
    })
}
