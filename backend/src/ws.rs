use crate::client::{SendMsg, Sender};
use crate::game::{Followup, SharedGame, Settings};
use common::messages::Response;
use futures::{FutureExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{error, info};
use uuid::Uuid;
use warp::ws::{Message, WebSocket};

pub async fn client_connection(ws: WebSocket, id: String, game: SharedGame, settings: Arc<Settings>) {
    let (client_ws_sender, mut client_ws_rcv) = ws.split();
    let (client_sender, client_rcv) = mpsc::unbounded_channel();

    let client_rcv = UnboundedReceiverStream::new(client_rcv);
    tokio::task::spawn(client_rcv.forward(client_ws_sender).map(|result| {
        if let Err(e) = result {
            error!("error sending websocket msg: {}", e);
        }
    }));

    let client = Sender(client_sender);
    // Several connections may share one game
    let connection = Uuid::new_v4().simple().to_string();
    info!("{} connected as {}", id, connection);
    {
        let game = game.lock().await;
        // If the client is already gone, the receive loop below ends straight away
        let _ = client.send_response(&Response::State(game.controller().snapshot()));
    }

    while let Some(result) = client_ws_rcv.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                error!("error receiving ws message for id: {}): {}", id, e);
                break;
            }
        };
        client_msg(&id, &connection, msg, &game, &client, &settings).await;
    }

    game.lock().await.disconnect(&connection);
    info!("{} disconnected from {}", connection, id);
}

#[tracing::instrument(skip(game, client, settings))]
async fn client_msg(
    id: &str,
    connection: &str,
    msg: Message,
    game: &SharedGame,
    client: &Sender,
    settings: &Arc<Settings>,
) {
    info!("received message from {}: {:?}", id, msg);
    let message = match msg.to_str() {
        Ok(v) => v.trim(),
        Err(_) => return,
    };

    if message == "ping" {
        return;
    }

    let followup = game.lock().await.handle_message(message, client);
    run_followup(followup, connection, game, client, settings).await;
}

async fn run_followup(
    followup: Followup,
    connection: &str,
    game: &SharedGame,
    client: &Sender,
    settings: &Arc<Settings>,
) {
    match followup {
        Followup::Nothing => {}
        Followup::StartAutoDraw => {
            let handle = spawn_auto_draw(game.clone(), client.clone(), settings.clone());
            game.lock().await.set_auto_draw_task(connection, handle);
        }
        Followup::RevealScore { generation } => {
            let handle = spawn_score_reveal(generation, game.clone(), client.clone(), settings.clone());
            game.lock().await.set_score_reveal_task(generation, handle);
        }
        Followup::Submit {
            generation,
            submission,
        } => {
            let game = game.clone();
            let client = client.clone();
            let submitter = settings.submitter.clone();
            // The lock is not held while waiting on the remote service
            tokio::spawn(async move {
                let outcome = submitter.submit(&submission).await;
                game.lock()
                    .await
                    .finish_submission(generation, outcome, &client);
            });
        }
    }
}

/// Draws on a fixed interval until auto-draw is switched off or the game ends.
///
/// The flag is checked under the game lock before every draw, so a stop that
/// lands between ticks always wins over the next tick.
pub fn spawn_auto_draw(game: SharedGame, client: Sender, settings: Arc<Settings>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(settings.auto_draw_interval);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let followup = {
                let mut game = game.lock().await;
                if !game.controller().is_auto_drawing() {
                    break;
                }
                game.draw(&client)
            };
            if let Followup::RevealScore { generation } = followup {
                let handle =
                    spawn_score_reveal(generation, game.clone(), client.clone(), settings.clone());
                game.lock().await.set_score_reveal_task(generation, handle);
                break;
            }
        }
        info!("auto-draw stopped");
    })
}

pub fn spawn_score_reveal(
    generation: u64,
    game: SharedGame,
    client: Sender,
    settings: Arc<Settings>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(settings.score_delay).await;
        game.lock().await.reveal_score(generation, &client);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;
    use crate::submit::ScoreSubmitter;
    use async_trait::async_trait;
    use common::{GameConfig, GameController, ScoreSubmission, SubmissionOutcome};
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::Mutex;

    struct AcceptAll;

    #[async_trait]
    impl ScoreSubmitter for AcceptAll {
        async fn submit(&self, _submission: &ScoreSubmission) -> SubmissionOutcome {
            SubmissionOutcome::Success { data: json!({"ok": true}) }
        }
    }

    fn settings(auto_draw_interval: Duration) -> Arc<Settings> {
        settings_with_delay(auto_draw_interval, Duration::from_millis(1))
    }

    fn settings_with_delay(auto_draw_interval: Duration, score_delay: Duration) -> Arc<Settings> {
        Arc::new(Settings {
            config: GameConfig::default(),
            address: "127.0.0.1:8000".parse().unwrap(),
            auto_draw_interval,
            score_delay,
            submitter: Arc::new(AcceptAll),
        })
    }

    fn new_game() -> SharedGame {
        Arc::new(Mutex::new(Game::new(GameController::new(GameConfig::default()))))
    }

    fn channel() -> (Sender, mpsc::UnboundedReceiver<Result<Message, warp::Error>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Sender(tx), rx)
    }

    fn responses(rx: &mut mpsc::UnboundedReceiver<Result<Message, warp::Error>>) -> Vec<Response> {
        let mut responses = vec![];
        while let Ok(Ok(msg)) = rx.try_recv() {
            responses.push(serde_json::from_str(msg.to_str().unwrap()).unwrap());
        }
        responses
    }

    #[tokio::test]
    async fn test_auto_draw_plays_to_the_end() {
        let game = new_game();
        let (client, mut rx) = channel();
        let settings = settings(Duration::from_millis(1));

        let followup = game.lock().await.handle_message("\"StartAutoDraw\"", &client);
        run_followup(followup, "alice", &game, &client, &settings).await;

        tokio::time::sleep(Duration::from_millis(500)).await;
        let game = game.lock().await;
        assert!(game.controller().is_ended());
        assert!(!game.controller().is_auto_drawing());
        assert_eq!(game.controller().cursor(), 15);
        let responses = responses(&mut rx);
        assert!(responses.contains(&Response::Score { score: 1924 }));
    }

    #[tokio::test]
    async fn test_stop_auto_draw() {
        let game = new_game();
        let (client, _rx) = channel();
        let settings = settings(Duration::from_millis(20));

        let followup = game.lock().await.handle_message("\"StartAutoDraw\"", &client);
        run_followup(followup, "alice", &game, &client, &settings).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let cursor = {
            let mut game = game.lock().await;
            game.handle_message("\"StopAutoDraw\"", &client);
            game.controller().cursor()
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let game = game.lock().await;
        assert_eq!(game.controller().cursor(), cursor);
        assert!(!game.controller().is_ended());
    }

    #[tokio::test]
    async fn test_submission_followup() {
        let game = new_game();
        let (client, mut rx) = channel();
        let settings = settings(Duration::from_millis(1));
        {
            let mut game = game.lock().await;
            while !game.controller().is_ended() {
                game.draw(&client);
            }
        }
        responses(&mut rx);

        let followup = game
            .lock()
            .await
            .handle_message("{\"Submit\":{\"name\":\"Greg\"}}", &client);
        run_followup(followup, "alice", &game, &client, &settings).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(game.lock().await.controller().is_submitted());
        let responses = responses(&mut rx);
        let Response::Notification(notification) = &responses[0] else {
            panic!("expected a notification, got {:?}", responses[0]);
        };
        assert_eq!(notification.title, "Hooray!");
    }

    #[tokio::test]
    async fn test_restart_cancels_pending_score_reveal() {
        let game = new_game();
        let (client, mut rx) = channel();
        let settings = settings_with_delay(Duration::from_millis(1), Duration::from_millis(50));

        for _ in 0..2 {
            let mut followup = Followup::Nothing;
            while !game.lock().await.controller().is_ended() {
                followup = game.lock().await.handle_message("\"Draw\"", &client);
            }
            run_followup(followup, "alice", &game, &client, &settings).await;
            if game.lock().await.controller().generation() == 0 {
                game.lock().await.handle_message("\"Restart\"", &client);
            }
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        let scores = responses(&mut rx)
            .into_iter()
            .filter(|response| matches!(response, Response::Score { .. }))
            .count();
        assert_eq!(scores, 1);
    }

    #[tokio::test]
    async fn test_auto_draw_survives_other_connection_leaving() {
        let game = new_game();
        let (client, _rx) = channel();
        let settings = settings(Duration::from_millis(20));

        let followup = game.lock().await.handle_message("\"StartAutoDraw\"", &client);
        run_followup(followup, "alice", &game, &client, &settings).await;
        game.lock().await.disconnect("bob");

        tokio::time::sleep(Duration::from_millis(100)).await;
        let game = game.lock().await;
        assert!(game.controller().is_auto_drawing());
        assert!(game.controller().cursor() > 0);
    }
}
