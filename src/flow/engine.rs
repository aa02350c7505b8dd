//! The quiz flow state machine.
//!
//! `QuizFlow` is owned by the client loop and mutated only from it. Network
//! calls and timers run as spawned tasks that report back through
//! [`FlowEvent`]s, which the loop hands to [`QuizFlow::handle`]. Each event
//! carries the [`Token`] that was current when the work started; anything
//! stamped with an older token is dropped on arrival.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future;
use indexmap::IndexMap;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::gateway::{GatewayError, QuizContentError, SessionGateway};
use crate::models::{Player, PlayerId, Question, Session, SessionCode, SessionStatus};

use super::countdown::Countdown;
use super::event::{FlowEvent, Lineup, Token};
use super::results::leaderboard;
use super::state::{
    CODE_MAX_LENGTH, CreateForm, JoinForm, Mode, NAME_MAX_LENGTH, Notice, ResultBoard, Role,
    RoleForm, RoundState, TOPIC_MAX_LENGTH,
};

/// Upper bound on players per session the client will ask for.
pub const MAX_PLAYERS_LIMIT: u8 = 8;

/// Timing and sizing knobs of the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSettings {
    /// Seconds allowed per question.
    pub round_seconds: u32,
    /// Interval between countdown ticks.
    pub tick: Duration,
    /// How long correctness stays on screen before moving on.
    pub feedback_pause: Duration,
    /// Player limit proposed when creating a session.
    pub max_players: u8,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            round_seconds: 30,
            tick: Duration::from_secs(1),
            feedback_pause: Duration::from_millis(1500),
            max_players: 2,
        }
    }
}

/// Input that fails local checks before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("enter a player name first")]
    MissingName,
    #[error("enter a quiz topic first")]
    MissingTopic,
    #[error("enter a session code first")]
    MissingSessionCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a request is already in progress")]
    Busy,
}

pub struct QuizFlow {
    gateway: Arc<dyn SessionGateway>,
    events: UnboundedSender<FlowEvent>,
    settings: FlowSettings,
    mode: Mode,
    player_name: String,
    player: Option<Player>,
    session: Option<Session>,
    questions: Vec<Question>,
    countdown: Countdown,
    token: Token,
    busy: bool,
    notice: Option<Notice>,
}

impl QuizFlow {
    /// Create an engine on the role screen. The receiver yields the events
    /// that must be fed back through [`QuizFlow::handle`].
    pub fn new(
        gateway: Arc<dyn SessionGateway>,
        settings: FlowSettings,
    ) -> (Self, UnboundedReceiver<FlowEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let flow = Self {
            gateway,
            events,
            settings,
            mode: Mode::default(),
            player_name: String::new(),
            player: None,
            session: None,
            questions: Vec::new(),
            countdown: Countdown::new(),
            token: Token::default(),
            busy: false,
            notice: None,
        };
        (flow, rx)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// True while a create/join request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.mode {
            Mode::InQuiz(round) => self.questions.get(round.current_index),
            _ => None,
        }
    }

    // ----- form editing -------------------------------------------------

    /// Type a character into the field of the current screen.
    pub fn input_char(&mut self, c: char) {
        if self.busy || c.is_control() {
            return;
        }
        match &mut self.mode {
            Mode::ChooseRole(form) => push_limited(&mut form.name, c, NAME_MAX_LENGTH),
            Mode::Creating(form) => push_limited(&mut form.topic, c, TOPIC_MAX_LENGTH),
            Mode::Joining(form) => {
                if c.is_ascii_alphanumeric() {
                    push_limited(&mut form.code, c.to_ascii_uppercase(), CODE_MAX_LENGTH);
                }
            }
            Mode::InQuiz(_) | Mode::Result(_) => {}
        }
    }

    pub fn input_backspace(&mut self) {
        if self.busy {
            return;
        }
        match &mut self.mode {
            Mode::ChooseRole(form) => {
                form.name.pop();
            }
            Mode::Creating(form) => {
                form.topic.pop();
            }
            Mode::Joining(form) => {
                form.code.pop();
            }
            Mode::InQuiz(_) | Mode::Result(_) => {}
        }
    }

    pub fn toggle_role(&mut self) {
        if let Mode::ChooseRole(form) = &mut self.mode {
            form.role = form.role.toggled();
        }
    }

    /// Change the player limit on the create screen, clamped to `1..=MAX_PLAYERS_LIMIT`.
    pub fn adjust_max_players(&mut self, delta: i8) {
        if self.busy {
            return;
        }
        if let Mode::Creating(form) = &mut self.mode {
            form.max_players = form
                .max_players
                .saturating_add_signed(delta)
                .clamp(1, MAX_PLAYERS_LIMIT);
        }
    }

    /// Move the option cursor, wrapping around. Ignored during feedback.
    pub fn move_highlight(&mut self, delta: isize) {
        let option_count = match self.current_question() {
            Some(question) => question.options().len(),
            None => return,
        };
        if let Mode::InQuiz(round) = &mut self.mode {
            if round.feedback_visible {
                return;
            }
            round.highlighted =
                (round.highlighted as isize + delta).rem_euclid(option_count as isize) as usize;
        }
    }

    /// Jump the cursor straight to an option.
    pub fn highlight(&mut self, index: usize) {
        let option_count = match self.current_question() {
            Some(question) => question.options().len(),
            None => return,
        };
        if let Mode::InQuiz(round) = &mut self.mode {
            if !round.feedback_visible && index < option_count {
                round.highlighted = index;
            }
        }
    }

    pub fn scroll_results(&mut self, delta: isize) {
        if let Mode::Result(board) = &mut self.mode {
            let rows = board.leaderboard.as_ref().map_or(0, Vec::len);
            let max_scroll = rows.saturating_sub(1);
            board.scroll = board.scroll.saturating_add_signed(delta).min(max_scroll);
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ----- transitions --------------------------------------------------

    /// Confirm the current screen: pick the role, create, or join.
    pub fn confirm(&mut self) -> Result<(), FlowError> {
        match self.mode {
            Mode::ChooseRole(_) => self.choose_role(),
            Mode::Creating(_) => self.create_session(),
            Mode::Joining(_) => self.join_session(),
            Mode::InQuiz(_) | Mode::Result(_) => Ok(()),
        }
    }

    /// Leave the role screen for the create or join form.
    pub fn choose_role(&mut self) -> Result<(), FlowError> {
        let Mode::ChooseRole(form) = &self.mode else {
            return Ok(());
        };
        let name = form.name.trim().to_string();
        let role = form.role;

        if name.is_empty() {
            return self.reject(ValidationError::MissingName);
        }

        self.player_name = name;
        self.notice = None;
        self.mode = match role {
            Role::Create => Mode::Creating(CreateForm {
                topic: String::new(),
                max_players: self.settings.max_players.clamp(1, MAX_PLAYERS_LIMIT),
            }),
            Role::Join => Mode::Joining(JoinForm::default()),
        };
        debug!(mode = self.mode.label(), "role chosen");
        Ok(())
    }

    /// Create a session, join it, then generate its quiz from the topic.
    pub fn create_session(&mut self) -> Result<(), FlowError> {
        let Mode::Creating(form) = &self.mode else {
            return Ok(());
        };
        if self.busy {
            return Err(FlowError::Busy);
        }
        let topic = form.topic.trim().to_string();
        let max_players = form.max_players;
        let name = self.player_name.trim().to_string();

        if name.is_empty() {
            return self.reject(ValidationError::MissingName);
        }
        if topic.is_empty() {
            return self.reject(ValidationError::MissingTopic);
        }

        info!(%topic, max_players, "creating session");
        let token = self.begin_setup();
        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = set_up_created(gateway, name, topic, max_players).await;
            let _ = events.send(FlowEvent::SetupFinished { token, outcome });
        });
        Ok(())
    }

    /// Join the session typed on the join screen and load its quiz.
    pub fn join_session(&mut self) -> Result<(), FlowError> {
        let Mode::Joining(form) = &self.mode else {
            return Ok(());
        };
        if self.busy {
            return Err(FlowError::Busy);
        }
        let code = form.code.trim().to_string();
        let name = self.player_name.trim().to_string();

        if name.is_empty() {
            return self.reject(ValidationError::MissingName);
        }
        if code.is_empty() {
            return self.reject(ValidationError::MissingSessionCode);
        }

        info!(%code, "joining session");
        let token = self.begin_setup();
        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = set_up_joined(gateway, name, SessionCode::new(code)).await;
            let _ = events.send(FlowEvent::SetupFinished { token, outcome });
        });
        Ok(())
    }

    /// Lock in an answer for the current question. `None` is a timeout.
    ///
    /// Returns `false` without touching any state when there is no active
    /// round, feedback is already showing, or no player identity is held.
    ///
    /// The round closes once the feedback pause has elapsed and the backend
    /// has acknowledged the answer, so a slow acknowledgement stretches the
    /// pause by up to the gateway's submission timeout.
    pub fn submit_answer(&mut self, selected: Option<String>) -> bool {
        let Some(player_id) = self.player.as_ref().map(|player| player.id.clone()) else {
            return false;
        };
        let Mode::InQuiz(round) = &mut self.mode else {
            return false;
        };
        if round.feedback_visible {
            return false;
        }
        let Some(question) = self.questions.get(round.current_index) else {
            return false;
        };

        let correct = question.is_correct(selected.as_deref());
        if correct {
            round.score += 1;
        }
        round.selected_answer = selected.clone();
        round.feedback_visible = true;
        info!(
            question = round.current_index + 1,
            correct,
            timed_out = selected.is_none(),
            score = round.score,
            "answer locked in"
        );

        self.countdown.cancel();
        let token = self.advance_token();
        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        let pause = self.settings.feedback_pause;
        tokio::spawn(async move {
            tokio::time::sleep(pause).await;
            let submission = gateway.submit_answer(&player_id, selected).await;
            let _ = events.send(FlowEvent::RoundClosed { token, submission });
        });
        true
    }

    /// Submit the option under the cursor.
    pub fn submit_highlighted(&mut self) -> bool {
        let selected = match (&self.mode, self.current_question()) {
            (Mode::InQuiz(round), Some(question)) => {
                question.options().get(round.highlighted).cloned()
            }
            _ => return false,
        };
        match selected {
            Some(option) => self.submit_answer(Some(option)),
            None => false,
        }
    }

    /// Fetch results and session status again from the result screen.
    pub fn refresh_results(&mut self) -> Result<(), FlowError> {
        match &self.mode {
            Mode::Result(board) if board.loading => Err(FlowError::Busy),
            Mode::Result(_) => {
                self.request_results();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Leave a setup form for the role screen, abandoning any request in flight.
    pub fn back(&mut self) {
        let role = match self.mode {
            Mode::Creating(_) => Role::Create,
            Mode::Joining(_) => Role::Join,
            _ => return,
        };
        if self.busy {
            debug!("abandoning setup request");
        }
        self.advance_token();
        self.busy = false;
        self.notice = None;
        self.mode = Mode::ChooseRole(RoleForm {
            name: self.player_name.clone(),
            role,
        });
    }

    /// Drop the player, session and quiz and return to the role screen.
    pub fn reset(&mut self) {
        info!("resetting client");
        self.countdown.cancel();
        self.advance_token();
        self.player = None;
        self.session = None;
        self.questions.clear();
        self.busy = false;
        self.notice = None;
        self.mode = Mode::ChooseRole(RoleForm {
            name: self.player_name.clone(),
            role: Role::default(),
        });
    }

    /// Apply an event produced by a timer or network task.
    pub fn handle(&mut self, event: FlowEvent) {
        match event {
            FlowEvent::Tick { token } => self.on_tick(token),
            FlowEvent::SetupFinished { token, outcome } => self.on_setup_finished(token, outcome),
            FlowEvent::RoundClosed { token, submission } => {
                self.on_round_closed(token, submission)
            }
            FlowEvent::ResultsFetched {
                token,
                results,
                status,
            } => self.on_results_fetched(token, results, status),
        }
    }

    // ----- event handlers -----------------------------------------------

    fn on_tick(&mut self, token: Token) {
        if token != self.token {
            return;
        }
        let Mode::InQuiz(round) = &mut self.mode else {
            self.countdown.cancel();
            return;
        };
        if round.feedback_visible {
            self.countdown.cancel();
            return;
        }

        round.countdown = round.countdown.saturating_sub(1);
        if round.countdown == 0 {
            info!(question = round.current_index + 1, "time is up");
            self.submit_answer(None);
        }
    }

    fn on_setup_finished(&mut self, token: Token, outcome: Result<Lineup, GatewayError>) {
        if token != self.token {
            debug!("discarding stale setup response");
            return;
        }
        self.busy = false;

        match outcome {
            Ok(lineup) if lineup.questions.is_empty() => {
                warn!("session setup returned an empty quiz");
                self.notice = Some(Notice::error(&QuizContentError::Empty));
            }
            Ok(lineup) => self.start_quiz(lineup),
            Err(err) => {
                warn!(error = %err, mode = self.mode.label(), "session setup failed");
                self.notice = Some(Notice::error(&err));
            }
        }
    }

    fn on_round_closed(&mut self, token: Token, submission: Result<(), GatewayError>) {
        if token != self.token {
            return;
        }

        match submission {
            Ok(()) => {
                if self.notice.as_ref().is_some_and(|n| !n.is_blocking()) {
                    self.notice = None;
                }
            }
            Err(err) => {
                warn!(error = %err, "answer submission failed; continuing");
                if !self.notice.as_ref().is_some_and(Notice::is_blocking) {
                    self.notice = Some(Notice::warning(&err));
                }
            }
        }

        let question_count = self.questions.len();
        let Mode::InQuiz(round) = &mut self.mode else {
            return;
        };
        if !round.feedback_visible {
            return;
        }

        if round.current_index + 1 < question_count {
            round.advance(self.settings.round_seconds);
            debug!(question = round.current_index + 1, "next question");
            self.arm_countdown();
        } else {
            let score = round.score;
            self.enter_result(score, question_count);
        }
    }

    fn on_results_fetched(
        &mut self,
        token: Token,
        results: Result<IndexMap<String, String>, GatewayError>,
        status: Result<SessionStatus, GatewayError>,
    ) {
        if token != self.token {
            return;
        }
        let Mode::Result(board) = &mut self.mode else {
            return;
        };
        board.loading = false;

        match results {
            Ok(results) => {
                debug!(players = results.len(), "results received");
                board.leaderboard = Some(leaderboard(results));
                board.scroll = 0;
            }
            Err(err) => {
                warn!(error = %err, "results fetch failed");
                self.notice = Some(Notice::error(&err));
            }
        }

        match status {
            Ok(status) => board.status = Some(status),
            Err(err) => {
                warn!(error = %err, "session status fetch failed");
                if self.notice.is_none() {
                    self.notice = Some(Notice::warning(&err));
                }
            }
        }
    }

    // ----- helpers ------------------------------------------------------

    fn reject(&mut self, err: ValidationError) -> Result<(), FlowError> {
        debug!(error = %err, mode = self.mode.label(), "input rejected");
        self.notice = Some(Notice::error(&err));
        Err(err.into())
    }

    fn advance_token(&mut self) -> Token {
        self.token = self.token.next();
        self.token
    }

    fn begin_setup(&mut self) -> Token {
        self.busy = true;
        self.notice = None;
        self.advance_token()
    }

    fn arm_countdown(&mut self) {
        let token = self.advance_token();
        self.countdown.start(token, self.settings.tick, self.events.clone());
    }

    fn start_quiz(&mut self, lineup: Lineup) {
        info!(
            code = %lineup.session.code(),
            player = %lineup.player.id,
            questions = lineup.questions.len(),
            "quiz started"
        );
        self.session = Some(lineup.session);
        self.player = Some(lineup.player);
        self.questions = lineup.questions;
        self.notice = None;
        self.mode = Mode::InQuiz(RoundState::new(self.settings.round_seconds));
        self.arm_countdown();
    }

    fn enter_result(&mut self, score: u32, question_count: usize) {
        info!(score, question_count, "quiz finished");
        self.countdown.cancel();
        self.mode = Mode::Result(ResultBoard::new(score, question_count));
        self.request_results();
    }

    fn request_results(&mut self) {
        let Some(code) = self.session.as_ref().map(|s| s.code().clone()) else {
            return;
        };
        let token = self.advance_token();
        if let Mode::Result(board) = &mut self.mode {
            board.loading = true;
        }

        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        tokio::spawn(async move {
            let (results, status) = future::join(
                gateway.fetch_results(&code),
                gateway.fetch_session_status(&code),
            )
            .await;
            let _ = events.send(FlowEvent::ResultsFetched {
                token,
                results,
                status,
            });
        });
    }
}

fn push_limited(field: &mut String, c: char, max_chars: usize) {
    if field.chars().count() < max_chars {
        field.push(c);
    }
}

async fn set_up_created(
    gateway: Arc<dyn SessionGateway>,
    name: String,
    topic: String,
    max_players: u8,
) -> Result<Lineup, GatewayError> {
    let code = gateway.create_session(max_players).await?;
    let id = gateway.join_session(&name, &code).await?;
    let questions = gateway.generate_quiz(&topic).await?;
    Ok(Lineup {
        session: Session::created(code, max_players),
        player: Player { id, name },
        questions,
    })
}

async fn set_up_joined(
    gateway: Arc<dyn SessionGateway>,
    name: String,
    code: SessionCode,
) -> Result<Lineup, GatewayError> {
    let id: PlayerId = gateway.join_session(&name, &code).await?;
    let questions = gateway.fetch_quiz(&code).await?;
    Ok(Lineup {
        session: Session::joined(code),
        player: Player { id, name },
        questions,
    })
}
