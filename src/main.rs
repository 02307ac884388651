use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use cascade_server::{
    app_state::AppState,
    auth::AuthGate,
    config::Config,
    handlers::{
        create_question, get_leaderboard, get_limit, get_profile, health_check,
        health_check_live, health_check_ready, list_users, login, register, set_subscription,
        set_user_role, start_test, submit_test, update_profile,
    },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config)
        .await
        .expect("failed to initialize application state");

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&state.config.cors_allowed_origin)
            .allowed_methods(vec!["GET", "POST", "PUT"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            // The auth gate resolves credentials through this service
            .app_data(web::Data::from(state.auth_service.clone()))
            .service(web::scope("/api/auth").service(register).service(login))
            .service(
                web::scope("/api/users")
                    .wrap(AuthGate::mandatory())
                    .service(get_profile)
                    .service(update_profile)
                    .service(list_users)
                    .service(set_user_role)
                    .service(set_subscription),
            )
            .service(
                web::scope("/api/quiz/questions")
                    .wrap(AuthGate::mandatory())
                    .service(create_question),
            )
            .service(
                web::scope("/api/quiz")
                    .wrap(AuthGate::optional())
                    .service(start_test)
                    .service(submit_test)
                    .service(get_limit)
                    .service(get_leaderboard),
            )
            .service(health_check)
            .service(health_check_ready)
            .service(health_check_live)
    })
    .bind((host, port))?
    .run()
    .await
}
