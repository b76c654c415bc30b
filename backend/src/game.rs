use crate::client::SendMsg;
use crate::submit::ScoreSubmitter;
use crate::util;
use common::messages::{Command, Response};
use common::{DrawOutcome, GameConfig, GameController, GameError, ScoreSubmission, SubmissionOutcome};
use hashbrown::HashMap;
use serde_json::from_str;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

// Every mutation of a game goes through its mutex, whether it comes from the
// client or from the auto-draw task.
pub type SharedGame = Arc<Mutex<Game>>;
pub type Games = Arc<RwLock<HashMap<String, SharedGame>>>;

pub struct Settings {
    pub config: GameConfig,
    pub address: SocketAddr,
    pub auto_draw_interval: Duration,
    pub score_delay: Duration,
    pub submitter: Arc<dyn ScoreSubmitter>,
}

// Async work a message asks for, run by the websocket loop once the game lock
// is released. Delayed work carries the generation it was started in.
#[derive(Debug, PartialEq)]
pub enum Followup {
    Nothing,
    StartAutoDraw,
    RevealScore {
        generation: u64,
    },
    Submit {
        generation: u64,
        submission: ScoreSubmission,
    },
}

#[derive(Debug)]
struct AutoDrawTask {
    // Connection that started the task
    owner: String,
    handle: JoinHandle<()>,
}

#[derive(Debug)]
pub struct Game {
    controller: GameController,
    auto_draw_task: Option<AutoDrawTask>,
    score_reveal_task: Option<JoinHandle<()>>,
    submitting: bool,
}

impl Game {
    pub fn new(controller: GameController) -> Self {
        Game {
            controller,
            auto_draw_task: None,
            score_reveal_task: None,
            submitting: false,
        }
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    pub fn handle_message(&mut self, msg: &str, client: &impl SendMsg) -> Followup {
        let command: Command = match from_str(msg) {
            Ok(command) => command,
            Err(err) => {
                warn!("Failed to deserialize input into command: {}", err);
                return Followup::Nothing;
            }
        };
        match command {
            Command::Draw => {
                // Manual draws are disabled while auto-draw runs
                if self.controller.is_auto_drawing() {
                    send_error(client, "Auto-draw is running. Stop it to draw manually");
                    return Followup::Nothing;
                }
                self.draw(client)
            }
            Command::StartAutoDraw => {
                if self.controller.is_auto_drawing() {
                    return Followup::Nothing;
                }
                match self.controller.start_auto_draw() {
                    Ok(()) => {
                        send_state(&self.controller, client);
                        Followup::StartAutoDraw
                    }
                    Err(err) => {
                        send_error(client, &err.to_string());
                        Followup::Nothing
                    }
                }
            }
            Command::StopAutoDraw => {
                self.stop_auto_draw();
                send_state(&self.controller, client);
                Followup::Nothing
            }
            Command::Restart => {
                self.stop_auto_draw();
                if let Some(handle) = self.score_reveal_task.take() {
                    handle.abort();
                }
                self.controller.restart();
                self.submitting = false;
                info!("game restarted");
                send_state(&self.controller, client);
                Followup::Nothing
            }
            Command::Submit { name } => {
                if self.submitting {
                    send_error(client, "A submission is already in progress");
                    return Followup::Nothing;
                }
                match self.controller.prepare_submission(&name) {
                    Ok(submission) => {
                        self.submitting = true;
                        Followup::Submit {
                            generation: self.controller.generation(),
                            submission,
                        }
                    }
                    Err(err) => {
                        send_error(client, &err.to_string());
                        Followup::Nothing
                    }
                }
            }
        }
    }

    pub fn draw(&mut self, client: &impl SendMsg) -> Followup {
        match self.controller.draw() {
            Ok(DrawOutcome::Continue { number, eliminated }) => {
                for id in &eliminated {
                    info!("{} won on {} and was eliminated", id, number);
                }
                send_state(&self.controller, client);
                Followup::Nothing
            }
            Ok(DrawOutcome::Ended { number, winner, score }) => {
                info!("{} won last on {}, score {}", winner, number, score);
                send_state(&self.controller, client);
                send_response(
                    client,
                    &Response::GameEnd {
                        winner,
                        last_drawn: number,
                    },
                );
                Followup::RevealScore {
                    generation: self.controller.generation(),
                }
            }
            Err(err @ GameError::GameEnded) => {
                warn!("Rejected draw: {}", err);
                send_error(client, &err.to_string());
                Followup::Nothing
            }
            Err(err @ GameError::Draw(_)) => {
                // The draw sequence ran out before the last board won
                error!("{}", err);
                self.stop_auto_draw();
                send_error(client, &err.to_string());
                Followup::Nothing
            }
        }
    }

    pub fn set_auto_draw_task(&mut self, owner: &str, handle: JoinHandle<()>) {
        let task = AutoDrawTask {
            owner: owner.to_string(),
            handle,
        };
        if let Some(previous) = self.auto_draw_task.replace(task) {
            previous.handle.abort();
        }
    }

    pub fn stop_auto_draw(&mut self) {
        self.controller.stop_auto_draw();
        if let Some(task) = self.auto_draw_task.take() {
            task.handle.abort();
        }
    }

    // Other connections to the same game keep their auto-draw running
    pub fn disconnect(&mut self, connection: &str) {
        let owns_auto_draw = self
            .auto_draw_task
            .as_ref()
            .map_or(false, |task| task.owner == connection);
        if owns_auto_draw {
            self.stop_auto_draw();
        }
    }

    pub fn set_score_reveal_task(&mut self, generation: u64, handle: JoinHandle<()>) {
        if generation != self.controller.generation() {
            handle.abort();
            return;
        }
        if let Some(previous) = self.score_reveal_task.replace(handle) {
            previous.abort();
        }
    }

    // Safe to call more than once. Sends nothing once the game has restarted
    pub fn reveal_score(&self, generation: u64, client: &impl SendMsg) {
        if generation != self.controller.generation() {
            return;
        }
        if let Some(score) = self.controller.score() {
            send_response(client, &Response::Score { score });
        }
    }

    pub fn finish_submission(
        &mut self,
        generation: u64,
        outcome: SubmissionOutcome,
        client: &impl SendMsg,
    ) {
        if generation != self.controller.generation() {
            info!("Dropping submission result from before a restart: {:?}", outcome);
            return;
        }
        self.submitting = false;
        let notification = self.controller.record_submission(outcome);
        send_response(client, &Response::Notification(notification));
        send_state(&self.controller, client);
    }
}

fn send_state(controller: &GameController, client: &impl SendMsg) {
    send_response(client, &Response::State(controller.snapshot()));
}

fn send_error(client: &impl SendMsg, message: &str) {
    send_response(
        client,
        &Response::Error {
            message: message.to_string(),
        },
    );
}

fn send_response(client: &impl SendMsg, response: &Response) {
    // If the message fails to send even after retries, there's not much we can do but proceed
    let _ = util::retry(1, || client.send_response(response));
}
