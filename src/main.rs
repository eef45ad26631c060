use actix_cors::Cors;
use actix_web::{
    http::Method,
    middleware::Logger as ActixLogger,
    web,
    App,
    HttpServer,
};

use buddyscript::api::api_scope;
use buddyscript::http::{
    json_error_handler,
    not_found_handler,
    path_error_handler,
    query_error_handler,
};
use buddyscript::logger::configure_logger;
use buddyscript_config::{parse_config, Environment, BUDDYSCRIPT_VERSION};
use buddyscript_models::database::{create_pool, get_database_client};
use buddyscript_models::database::migrate::apply_migrations;

// Multipart forms carry a single image plus a few text fields
const PAYLOAD_OVERHEAD: usize = 1024 * 64;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = parse_config();
    configure_logger(config.log_level);
    log::info!("config loaded from {}", config.config_path);

    let pool_size = config.database_pool_size
        .unwrap_or(num_cpus::get() * 2);
    let db_pool = create_pool(&config.database_url, pool_size);
    let mut db_client = get_database_client(&db_pool).await
        .expect("failed to connect to database");
    apply_migrations(&mut **db_client).await;
    drop(db_client);
    log::info!(
        "buddyscript {} initialized; environment = '{:?}'",
        BUDDYSCRIPT_VERSION,
        config.environment,
    );

    let http_socket_addr = format!(
        "{}:{}",
        config.http_host,
        config.http_port,
    );
    let num_workers = std::cmp::max(num_cpus::get(), 4);
    let payload_limit = config.limits.media.file_size_limit + PAYLOAD_OVERHEAD;
    HttpServer::new(move || {
        let cors_config = match config.environment {
            Environment::Development => {
                Cors::permissive()
            },
            Environment::Production => {
                Cors::default()
                    .allowed_origin(&config.client_origin())
                    .allowed_methods([
                        Method::GET,
                        Method::POST,
                        Method::PATCH,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_any_header()
                    .supports_credentials()
            },
        };
        App::new()
            .wrap(ActixLogger::new("%r : %s : %{r}a"))
            .wrap(cors_config)
            .app_data(web::PayloadConfig::default().limit(payload_limit))
            .app_data(web::JsonConfig::default()
                .error_handler(json_error_handler))
            .app_data(web::QueryConfig::default()
                .error_handler(query_error_handler))
            .app_data(web::PathConfig::default()
                .error_handler(path_error_handler))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .service(api_scope())
            .default_service(web::route().to(not_found_handler))
    })
    .workers(num_workers)
    .bind(http_socket_addr)?
    .run()
    .await
}
