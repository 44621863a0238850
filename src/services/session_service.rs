use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::Duration,
};

use chrono::{DateTime, Utc};
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
    time::Instant,
};
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::QuestionParams, dto::response::SessionView},
    services::{
        session::{AdvanceOutcome, QuizSession, SelectOutcome},
        trivia_service::TriviaService,
    },
};

struct SessionSlot {
    session: QuizSession,
    /// Bumped on every reset and on teardown. Tasks carry the value they were
    /// spawned under and do nothing once it no longer matches.
    generation: u64,
    fetch_task: Option<JoinHandle<()>>,
    advance_task: Option<JoinHandle<()>>,
    started_at: DateTime<Utc>,
    /// Last client command or poll. Idle sessions are evicted from this.
    last_active: Instant,
}

impl SessionSlot {
    fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    /// Cancels pending work and invalidates any task that already woke up.
    fn close(&mut self) {
        self.cancel_tasks();
        self.generation += 1;
    }

    fn cancel_tasks(&mut self) {
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
        if let Some(task) = self.advance_task.take() {
            task.abort();
        }
    }
}

struct SessionHandle {
    id: Uuid,
    params: QuestionParams,
    slot: Mutex<SessionSlot>,
}

impl SessionHandle {
    fn view(&self, slot: &SessionSlot) -> SessionView {
        SessionView::build(self.id, &self.params, &slot.session, slot.started_at)
    }
}

/// Owns the live quiz sessions and drives their asynchronous transitions:
/// question fetches and the delayed advance after each reveal.
pub struct SessionService {
    trivia: Arc<TriviaService>,
    sessions: RwLock<HashMap<Uuid, Arc<SessionHandle>>>,
    advance_delay: Duration,
    idle_timeout: Duration,
}

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

impl SessionService {
    pub fn new(trivia: Arc<TriviaService>, advance_delay: Duration) -> Self {
        Self {
            trivia,
            sessions: RwLock::new(HashMap::new()),
            advance_delay,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Sessions with no command or poll for `idle_timeout` are dropped by
    /// `evict_idle`.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Creates a session in `loading` and starts fetching its questions.
    pub async fn start_session(&self, params: QuestionParams) -> AppResult<SessionView> {
        let handle = Arc::new(SessionHandle {
            id: Uuid::new_v4(),
            params,
            slot: Mutex::new(SessionSlot {
                session: QuizSession::new(),
                generation: 0,
                fetch_task: None,
                advance_task: None,
                started_at: Utc::now(),
                last_active: Instant::now(),
            }),
        });

        let mut slot = handle.slot.lock().await;
        slot.fetch_task = Some(self.spawn_fetch(&handle, slot.generation));
        let view = handle.view(&slot);
        drop(slot);

        log::info!("Session {} started with {:?}", handle.id, handle.params);
        self.sessions.write().await.insert(handle.id, handle);
        Ok(view)
    }

    pub async fn get_session(&self, id: &Uuid) -> AppResult<SessionView> {
        let handle = self.handle(id).await?;
        let mut slot = handle.slot.lock().await;
        slot.touch();
        Ok(handle.view(&slot))
    }

    /// Applies the selection and schedules the advance. A selection that the
    /// state machine ignores leaves the session untouched.
    pub async fn select_answer(&self, id: &Uuid, answer: &str) -> AppResult<SessionView> {
        let handle = self.handle(id).await?;
        let mut slot = handle.slot.lock().await;
        slot.touch();

        match slot.session.select_answer(answer) {
            SelectOutcome::Accepted { correct } => {
                log::debug!(
                    "Session {} question {} answered ({})",
                    handle.id,
                    slot.session.current_index() + 1,
                    if correct { "correct" } else { "incorrect" }
                );
                let generation = slot.generation;
                slot.advance_task = Some(self.spawn_advance(&handle, generation));
            }
            SelectOutcome::Ignored(reason) => {
                log::debug!("Session {} ignored selection: {:?}", handle.id, reason);
            }
        }

        Ok(handle.view(&slot))
    }

    /// Resets score and progress, drops the cached batch for these params and
    /// fetches a fresh one.
    pub async fn play_again(&self, id: &Uuid) -> AppResult<SessionView> {
        let handle = self.handle(id).await?;
        let mut slot = handle.slot.lock().await;

        slot.close();
        slot.touch();
        slot.session.reset();
        slot.started_at = Utc::now();
        self.trivia.invalidate_questions(&handle.params).await;
        slot.fetch_task = Some(self.spawn_fetch(&handle, slot.generation));

        log::info!("Session {} restarted", handle.id);
        Ok(handle.view(&slot))
    }

    /// Destroys the session. Pending fetch and advance tasks are cancelled.
    pub async fn exit_to_setup(&self, id: &Uuid) -> AppResult<()> {
        let handle = self
            .sessions
            .write()
            .await
            .remove(id)
            .ok_or_else(|| not_found(id))?;

        handle.slot.lock().await.close();

        log::info!("Session {} closed", handle.id);
        Ok(())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session idle for at least the idle timeout, cancelling
    /// its pending fetch and advance. Returns how many were dropped.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;

        let mut expired = Vec::new();
        for (id, handle) in sessions.iter() {
            if handle.slot.lock().await.last_active.elapsed() >= self.idle_timeout {
                expired.push(*id);
            }
        }

        for id in &expired {
            if let Some(handle) = sessions.remove(id) {
                handle.slot.lock().await.close();
                log::info!("Session {} evicted after {:?} idle", id, self.idle_timeout);
            }
        }
        expired.len()
    }

    /// Runs `evict_idle` every `period` until the service is dropped.
    pub fn spawn_idle_sweeper(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let weak: Weak<SessionService> = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(service) = weak.upgrade() else {
                    break;
                };
                let evicted = service.evict_idle().await;
                if evicted > 0 {
                    log::debug!("Idle sweep dropped {} session(s)", evicted);
                }
            }
        })
    }

    async fn handle(&self, id: &Uuid) -> AppResult<Arc<SessionHandle>> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    fn spawn_fetch(&self, handle: &Arc<SessionHandle>, generation: u64) -> JoinHandle<()> {
        let trivia = Arc::clone(&self.trivia);
        let weak: Weak<SessionHandle> = Arc::downgrade(handle);
        let params = handle.params.clone();

        tokio::spawn(async move {
            let result = trivia.fetch_questions(&params).await;

            let Some(handle) = weak.upgrade() else {
                return;
            };
            let mut slot = handle.slot.lock().await;
            if slot.generation != generation {
                return;
            }
            slot.fetch_task = None;

            match result.and_then(|questions| slot.session.load(questions)) {
                Ok(()) => log::info!(
                    "Session {} active with {} questions",
                    handle.id,
                    slot.session.total_questions()
                ),
                Err(err) => {
                    if err.is_fetch_failure() {
                        log::warn!("Session {} failed to load: {}", handle.id, err);
                    } else {
                        log::error!("Session {} failed to load: {}", handle.id, err);
                    }
                    slot.session.fail(&err);
                }
            }
        })
    }

    fn spawn_advance(&self, handle: &Arc<SessionHandle>, generation: u64) -> JoinHandle<()> {
        let weak: Weak<SessionHandle> = Arc::downgrade(handle);
        let delay = self.advance_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(handle) = weak.upgrade() else {
                return;
            };
            let mut slot = handle.slot.lock().await;
            if slot.generation != generation {
                return;
            }
            slot.advance_task = None;

            match slot.session.advance() {
                AdvanceOutcome::NextQuestion(index) => {
                    log::debug!("Session {} moved to question {}", handle.id, index + 1)
                }
                AdvanceOutcome::Completed => log::info!(
                    "Session {} completed with score {}/{}",
                    handle.id,
                    slot.session.score(),
                    slot.session.total_questions()
                ),
                AdvanceOutcome::Ignored => {}
            }
        })
    }
}

fn not_found(id: &Uuid) -> AppError {
    AppError::NotFound(format!("Session with id '{}' not found", id))
}
