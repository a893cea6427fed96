use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::error::StoreError;
use crate::models::{
    validate_price, NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant,
    RestaurantPizza,
};

pub fn find_all_restaurants(conn: &SqliteConnection) -> QueryResult<Vec<Restaurant>> {
    use crate::schema::restaurants::dsl::*;

    restaurants.order(id.asc()).load::<Restaurant>(conn)
}

pub fn find_restaurant(
    restaurant_id: i32,
    conn: &SqliteConnection,
) -> QueryResult<Option<Restaurant>> {
    use crate::schema::restaurants::dsl::*;

    restaurants.find(restaurant_id).first(conn).optional()
}

/// A restaurant together with every association that references it.
pub fn find_restaurant_with_pizzas(
    restaurant_id: i32,
    conn: &SqliteConnection,
) -> QueryResult<Option<(Restaurant, Vec<RestaurantPizza>)>> {
    use crate::schema::restaurant_pizzas::dsl::id;

    let restaurant = match find_restaurant(restaurant_id, conn)? {
        Some(r) => r,
        None => return Ok(None),
    };
    let links = RestaurantPizza::belonging_to(&restaurant)
        .order(id.asc())
        .load::<RestaurantPizza>(conn)?;
    Ok(Some((restaurant, links)))
}

/// Deletes the restaurant and its associations in one transaction. An unknown
/// id leaves the store untouched.
pub fn delete_restaurant(restaurant_id: i32, conn: &SqliteConnection) -> Result<(), StoreError> {
    use crate::schema::{restaurant_pizzas, restaurants};

    conn.transaction(|| {
        diesel::delete(
            restaurant_pizzas::table.filter(restaurant_pizzas::restaurant_id.eq(restaurant_id)),
        )
        .execute(conn)?;
        let deleted = diesel::delete(restaurants::table.find(restaurant_id)).execute(conn)?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    })
}

pub fn insert_restaurant(new: &NewRestaurant, conn: &SqliteConnection) -> QueryResult<Restaurant> {
    use crate::schema::restaurants::dsl::*;

    conn.transaction(|| {
        diesel::insert_into(restaurants).values(new).execute(conn)?;
        restaurants.order(id.desc()).first(conn)
    })
}

pub fn find_all_pizzas(conn: &SqliteConnection) -> QueryResult<Vec<Pizza>> {
    use crate::schema::pizzas::dsl::*;

    pizzas.order(id.asc()).load::<Pizza>(conn)
}

pub fn find_pizza(pizza_id: i32, conn: &SqliteConnection) -> QueryResult<Option<Pizza>> {
    use crate::schema::pizzas::dsl::*;

    pizzas.find(pizza_id).first(conn).optional()
}

/// Same ownership rule as restaurants: the pizza's associations go with it.
pub fn delete_pizza(pizza_id: i32, conn: &SqliteConnection) -> Result<(), StoreError> {
    use crate::schema::{pizzas, restaurant_pizzas};

    conn.transaction(|| {
        diesel::delete(restaurant_pizzas::table.filter(restaurant_pizzas::pizza_id.eq(pizza_id)))
            .execute(conn)?;
        let deleted = diesel::delete(pizzas::table.find(pizza_id)).execute(conn)?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    })
}

pub fn insert_pizza(new: &NewPizza, conn: &SqliteConnection) -> QueryResult<Pizza> {
    use crate::schema::pizzas::dsl::*;

    conn.transaction(|| {
        diesel::insert_into(pizzas).values(new).execute(conn)?;
        pizzas.order(id.desc()).first(conn)
    })
}

/// Inserts an association after re-checking its price. Any failure rolls the
/// transaction back.
pub fn create_restaurant_pizza(
    new: NewRestaurantPizza,
    conn: &SqliteConnection,
) -> Result<RestaurantPizza, StoreError> {
    use crate::schema::restaurant_pizzas::dsl::*;

    validate_price(new.price)?;
    conn.transaction(|| {
        diesel::insert_into(restaurant_pizzas)
            .values(&new)
            .execute(conn)?;
        let created = restaurant_pizzas
            .order(id.desc())
            .first::<RestaurantPizza>(conn)?;
        Ok(created)
    })
}

pub fn count_restaurant_pizzas(conn: &SqliteConnection) -> QueryResult<i64> {
    use crate::schema::restaurant_pizzas::dsl::*;

    restaurant_pizzas.count().get_result(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_schema, prepare_connection};
    use crate::models::PriceError;

    fn connection() -> SqliteConnection {
        let conn = SqliteConnection::establish(":memory:").unwrap();
        prepare_connection(&conn).unwrap();
        create_schema(&conn).unwrap();
        conn
    }

    fn restaurant(conn: &SqliteConnection, name: &str) -> Restaurant {
        insert_restaurant(
            &NewRestaurant {
                name,
                address: "1 Main St",
            },
            conn,
        )
        .unwrap()
    }

    fn pizza(conn: &SqliteConnection, name: &str) -> Pizza {
        insert_pizza(
            &NewPizza {
                name,
                ingredients: "Dough, Tomato Sauce, Cheese",
            },
            conn,
        )
        .unwrap()
    }

    fn link(conn: &SqliteConnection, r: &Restaurant, p: &Pizza, price: f64) -> RestaurantPizza {
        create_restaurant_pizza(
            NewRestaurantPizza {
                price,
                pizza_id: p.id,
                restaurant_id: r.id,
            },
            conn,
        )
        .unwrap()
    }

    #[test]
    fn lists_in_id_order() {
        let conn = connection();
        let a = restaurant(&conn, "Karen's Pizza Shack");
        let b = restaurant(&conn, "Sanjay's Pizza");
        assert_eq!(find_all_restaurants(&conn).unwrap(), vec![a, b]);

        let p = pizza(&conn, "Emma");
        let q = pizza(&conn, "Geri");
        assert_eq!(find_all_pizzas(&conn).unwrap(), vec![p, q]);
    }

    #[test]
    fn restaurant_names_are_unique() {
        let conn = connection();
        restaurant(&conn, "Kiki's Pizza");
        let dup = insert_restaurant(
            &NewRestaurant {
                name: "Kiki's Pizza",
                address: "elsewhere",
            },
            &conn,
        );
        assert!(dup.is_err());
    }

    #[test]
    fn detail_includes_only_own_associations() {
        let conn = connection();
        let a = restaurant(&conn, "A");
        let b = restaurant(&conn, "B");
        let p = pizza(&conn, "Melanie");
        let la = link(&conn, &a, &p, 5.0);
        link(&conn, &b, &p, 7.0);

        let (found, links) = find_restaurant_with_pizzas(a.id, &conn).unwrap().unwrap();
        assert_eq!(found, a);
        assert_eq!(links, vec![la]);
        assert!(find_restaurant_with_pizzas(999, &conn).unwrap().is_none());
    }

    #[test]
    fn deleting_restaurant_removes_its_links_only() {
        let conn = connection();
        let a = restaurant(&conn, "A");
        let b = restaurant(&conn, "B");
        let p = pizza(&conn, "Melanie");
        link(&conn, &a, &p, 5.0);
        link(&conn, &a, &p, 6.0);
        let kept = link(&conn, &b, &p, 7.0);

        delete_restaurant(a.id, &conn).unwrap();
        assert!(find_restaurant(a.id, &conn).unwrap().is_none());
        assert_eq!(find_pizza(p.id, &conn).unwrap(), Some(p));
        assert_eq!(count_restaurant_pizzas(&conn).unwrap(), 1);
        let (_, links) = find_restaurant_with_pizzas(b.id, &conn).unwrap().unwrap();
        assert_eq!(links, vec![kept]);
    }

    #[test]
    fn deleting_unknown_restaurant_is_not_found() {
        let conn = connection();
        assert!(matches!(delete_restaurant(42, &conn), Err(StoreError::NotFound)));
    }

    #[test]
    fn deleting_pizza_removes_its_links() {
        let conn = connection();
        let a = restaurant(&conn, "A");
        let p = pizza(&conn, "Emma");
        link(&conn, &a, &p, 10.0);

        delete_pizza(p.id, &conn).unwrap();
        assert!(find_pizza(p.id, &conn).unwrap().is_none());
        assert_eq!(count_restaurant_pizzas(&conn).unwrap(), 0);
        assert_eq!(find_restaurant(a.id, &conn).unwrap(), Some(a));
        assert!(matches!(delete_pizza(p.id, &conn), Err(StoreError::NotFound)));
    }

    #[test]
    fn create_rejects_out_of_range_price_before_writing() {
        let conn = connection();
        let a = restaurant(&conn, "A");
        let p = pizza(&conn, "Emma");
        let err = create_restaurant_pizza(
            NewRestaurantPizza {
                price: 31.0,
                pizza_id: p.id,
                restaurant_id: a.id,
            },
            &conn,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidPrice(PriceError::OutOfRange(_))
        ));
        assert_eq!(count_restaurant_pizzas(&conn).unwrap(), 0);
    }

    #[test]
    fn create_with_dangling_reference_rolls_back() {
        let conn = connection();
        let a = restaurant(&conn, "A");
        let err = create_restaurant_pizza(
            NewRestaurantPizza {
                price: 10.0,
                pizza_id: 404,
                restaurant_id: a.id,
            },
            &conn,
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
        assert_eq!(count_restaurant_pizzas(&conn).unwrap(), 0);
    }

    #[test]
    fn identical_creates_produce_distinct_rows() {
        let conn = connection();
        let a = restaurant(&conn, "A");
        let p = pizza(&conn, "Emma");
        let first = link(&conn, &a, &p, 15.0);
        let second = link(&conn, &a, &p, 15.0);
        assert_ne!(first.id, second.id);
        assert_eq!(first.price, second.price);
        assert_eq!(count_restaurant_pizzas(&conn).unwrap(), 2);
    }
}
