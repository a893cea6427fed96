table! {
    restaurants (id) {
        id -> Integer,
        name -> Text,
        address -> Text,
    }
}

table! {
    pizzas (id) {
        id -> Integer,
        name -> Text,
        ingredients -> Text,
    }
}

table! {
    restaurant_pizzas (id) {
        id -> Integer,
        price -> Double,
        pizza_id -> Integer,
        restaurant_id -> Integer,
    }
}

joinable!(restaurant_pizzas -> pizzas (pizza_id));
joinable!(restaurant_pizzas -> restaurants (restaurant_id));

allow_tables_to_appear_in_same_query!(pizzas, restaurant_pizzas, restaurants);
