use crate::cli::{Cli, ConfigLoadError};
use crate::game::{Games, Settings};
use crate::submit::HttpSubmitter;
use clap::Parser;
use hashbrown::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;
use warp::{
    http::{header, Method},
    Filter, Rejection, Reply,
};

mod cli;
mod client;
mod game;
mod handler;
mod submit;
mod util;
mod ws;

#[derive(Error, Debug)]
enum ServerError {
    #[error("{0}")]
    Config(#[from] ConfigLoadError),
    #[error("Failed to install the log subscriber: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error("Failed to build the HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();

    let file_appender = tracing_appender::rolling::daily(&cli.log_dir, "server.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.load_config()?;
    info!(
        "loaded {} boards and {} draws",
        config.boards().len(),
        config.draws().len()
    );
    let settings = Arc::new(Settings {
        config,
        address: cli.address(),
        auto_draw_interval: cli.auto_draw_interval(),
        score_delay: cli.score_delay(),
        submitter: Arc::new(HttpSubmitter::new(&cli.submit_url)?),
    });
    let games: Games = Arc::new(RwLock::new(HashMap::new()));

    info!("listening on {}", settings.address);
    warp::serve(routes(games, settings.clone()))
        .run(settings.address)
        .await;
    Ok(())
}

fn routes(
    games: Games,
    settings: Arc<Settings>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let health_route = warp::path!("health").and_then(handler::health_handler);

    let game_routes = warp::path!("games")
        .and(warp::post())
        .and(with_games(games.clone()))
        .and(with_settings(settings.clone()))
        .and_then(handler::create_game_handler)
        .or(warp::path!("games" / String)
            .and(warp::get())
            .and(with_games(games.clone()))
            .and_then(handler::game_state_handler))
        .or(warp::path!("games" / String)
            .and(warp::delete())
            .and(with_games(games.clone()))
            .and_then(handler::delete_game_handler));

    let ws_route = warp::path("ws")
        .and(warp::ws())
        .and(warp::path::param())
        .and(with_games(games))
        .and(with_settings(settings))
        .and_then(handler::ws_handler);

    health_route.or(game_routes).or(ws_route).with(
        warp::cors()
            .allow_credentials(true)
            .allow_methods(&[
                Method::OPTIONS,
                Method::GET,
                Method::POST,
                Method::DELETE,
                Method::PUT,
            ])
            .allow_headers(vec![
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
            ])
            .expose_headers(vec![header::LINK])
            .max_age(300)
            .allow_any_origin(),
    )
}

fn with_games(games: Games) -> impl Filter<Extract = (Games,), Error = Infallible> + Clone {
    warp::any().map(move || games.clone())
}

fn with_settings(
    settings: Arc<Settings>,
) -> impl Filter<Extract = (Arc<Settings>,), Error = Infallible> + Clone {
    warp::any().map(move || settings.clone())
}
