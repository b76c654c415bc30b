use crate::game::{Game, Games, Settings};
use crate::ws;
use common::messages::{CreateGameResponse, Response};
use common::GameController;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;
use warp::{
    http::StatusCode,
    reply::{json, with_status},
    Rejection, Reply,
};

type Result<T> = std::result::Result<T, Rejection>;

pub async fn create_game_handler(games: Games, settings: Arc<Settings>) -> Result<impl Reply> {
    let id = Uuid::new_v4().as_simple().to_string();
    let game = Game::new(GameController::new(settings.config.clone()));
    games
        .write()
        .await
        .insert(id.clone(), Arc::new(Mutex::new(game)));
    info!("created game {}", id);

    Ok(json(&CreateGameResponse {
        url: format!("ws://{}/ws/{}", settings.address, id),
        id,
    }))
}

pub async fn game_state_handler(id: String, games: Games) -> Result<impl Reply> {
    let game = games.read().await.get(&id).cloned();
    match game {
        Some(game) => {
            let snapshot = game.lock().await.controller().snapshot();
            Ok(with_status(json(&snapshot), StatusCode::OK))
        }
        None => Ok(with_status(json(&unknown_game(&id)), StatusCode::NOT_FOUND)),
    }
}

pub async fn delete_game_handler(id: String, games: Games) -> Result<impl Reply> {
    let game = games.write().await.remove(&id);
    match game {
        Some(game) => {
            game.lock().await.stop_auto_draw();
            info!("removed game {}", id);
            Ok(StatusCode::OK)
        }
        None => Ok(StatusCode::NOT_FOUND),
    }
}

fn unknown_game(id: &str) -> Response {
    Response::Error {
        message: format!("No game with ID {}", id),
    }
}

pub async fn ws_handler(
    ws: warp::ws::Ws,
    id: String,
    games: Games,
    settings: Arc<Settings>,
) -> Result<impl Reply> {
    let game = games.read().await.get(&id).cloned();
    match game {
        Some(game) => {
            Ok(ws.on_upgrade(move |socket| ws::client_connection(socket, id, game, settings)))
        }
        None => Err(warp::reject::not_found()),
    }
}

pub async fn health_handler() -> Result<impl Reply> {
    Ok(StatusCode::OK)
}
