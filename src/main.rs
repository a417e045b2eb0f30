use actix_web::{App, HttpServer, middleware::Logger, web};
use actix_cors::Cors;
use log::{error, info};
use reqwest::Client;

use gymclub_be::AppState;
use gymclub_be::config::Config;
use gymclub_be::handlers::api_services;

fn mask_key(k: &str) -> String {
    if k.len() <= 8 {
        "[REDACTED]".to_string()
    } else {
        format!("{}***{}", &k[..4], &k[k.len() - 4..])
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Supabase URL: {}", config.supabase_url);
    info!(
        "Supabase service key: {}",
        mask_key(&config.supabase_service_role_key)
    );

    let http_client = Client::builder()
        .user_agent("gymclub-be/0.1")
        .build()
        .expect("failed to build http client");

    let allowed_origins = config.allowed_origins.clone();
    let bind_address = format!("0.0.0.0:{}", config.port);
    let state = web::Data::new(AppState::new(config, http_client));

    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                "authorization",
                "content-type",
                "accept",
                "x-requested-with",
            ])
            .supports_credentials()
            .max_age(3600);
        for origin in allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(api_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}
