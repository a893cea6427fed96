use pizza_restaurants::{init_pool, seed, Config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()?;
    let pool = init_pool(&config.database_url, 1)?;
    let conn = pool.get()?;

    log::info!("seeding {}", config.database_url);
    let summary = seed::reseed(&conn)?;
    log::info!(
        "seeded {} restaurants, {} pizzas, {} restaurant_pizzas",
        summary.restaurants,
        summary.pizzas,
        summary.restaurant_pizzas
    );
    Ok(())
}
