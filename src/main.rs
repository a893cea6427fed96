use actix_web::{middleware, web, App, HttpServer};

use pizza_restaurants::{handlers, init_pool, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    // set up database connection pool and make sure the tables exist
    let pool = init_pool(&config.database_url, config.pool_size).map_err(|e| {
        log::error!("database {} unavailable: {}", config.database_url, e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    log::info!(
        "starting HTTP server at http://{}:{} (database {})",
        config.host,
        config.port,
        config.database_url
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
