//! Актор стола: единственный владелец `TableEngine`.
//!
//! Все команды, запросы и срабатывания таймера проходят через один цикл,
//! поэтому операции над фишками стола никогда не пересекаются.
//! Разные столы – разные задачи tokio без общего состояния.
//!
//! Публичные события идут в broadcast-канал стола. Приватные (`HoleCards`)
//! туда не попадают: актор кладёт их только в личный канал адресата.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::api::commands::TableCommand;
use crate::api::dto::{ActionRequest, TableSnapshot};
use crate::api::events::TableEvent;
use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::engine::{EngineError, HandHistory, PlayerIntent, RandomSource, TableEngine};
use crate::runtime::manager::ManagerError;
use crate::time_ctrl::{TimeController, TimeoutState};

const INBOX_CAPACITY: usize = 128;
const EVENTS_CAPACITY: usize = 1024;
const PRIVATE_CAPACITY: usize = 64;

/// Сообщения в inbox стола.
pub enum TableMessage {
    Command {
        command: TableCommand,
        reply: oneshot::Sender<Result<Vec<TableEvent>, EngineError>>,
    },
    Snapshot {
        viewer: Option<PlayerId>,
        reply: oneshot::Sender<TableSnapshot>,
    },
    ActionRequest {
        reply: oneshot::Sender<Option<ActionRequest>>,
    },
    LastHandHistory {
        reply: oneshot::Sender<Option<HandHistory>>,
    },
    /// Личный канал игрока; новый запрос заменяет прежний канал.
    PrivateEvents {
        player_id: PlayerId,
        reply: oneshot::Sender<mpsc::Receiver<TableEvent>>,
    },
    Shutdown,
}

/// Ручка для отправки команд столу и подписки на его события.
#[derive(Clone)]
pub struct TableHandle {
    table_id: TableId,
    sender: mpsc::Sender<TableMessage>,
    events: broadcast::Sender<TableEvent>,
}

impl TableHandle {
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Подписка на публичные события стола.
    pub fn subscribe(&self) -> broadcast::Receiver<TableEvent> {
        self.events.subscribe()
    }

    /// Личные события игрока (карманные карты).
    pub async fn private_events(
        &self,
        player_id: PlayerId,
    ) -> Result<mpsc::Receiver<TableEvent>, ManagerError> {
        self.request(|reply| TableMessage::PrivateEvents { player_id, reply })
            .await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> TableMessage,
    ) -> Result<T, ManagerError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(make(reply))
            .await
            .map_err(|_| ManagerError::TableClosed(self.table_id))?;
        response
            .await
            .map_err(|_| ManagerError::TableClosed(self.table_id))
    }

    pub async fn execute(&self, command: TableCommand) -> Result<Vec<TableEvent>, ManagerError> {
        let result = self
            .request(|reply| TableMessage::Command { command, reply })
            .await?;
        Ok(result?)
    }

    pub async fn sit_down(
        &self,
        seat: SeatIndex,
        player_id: PlayerId,
        buy_in: Chips,
    ) -> Result<Vec<TableEvent>, ManagerError> {
        self.execute(TableCommand::SitDown {
            seat,
            player_id,
            buy_in,
        })
        .await
    }

    pub async fn stand_up(&self, seat: SeatIndex) -> Result<Vec<TableEvent>, ManagerError> {
        self.execute(TableCommand::StandUp { seat }).await
    }

    pub async fn submit(&self, intent: PlayerIntent) -> Result<Vec<TableEvent>, ManagerError> {
        self.execute(TableCommand::Intent(intent)).await
    }

    pub async fn start_hand(&self) -> Result<Vec<TableEvent>, ManagerError> {
        self.execute(TableCommand::StartHand).await
    }

    pub async fn snapshot(&self, viewer: Option<PlayerId>) -> Result<TableSnapshot, ManagerError> {
        self.request(|reply| TableMessage::Snapshot { viewer, reply })
            .await
    }

    pub async fn action_request(&self) -> Result<Option<ActionRequest>, ManagerError> {
        self.request(|reply| TableMessage::ActionRequest { reply })
            .await
    }

    pub async fn last_hand_history(&self) -> Result<Option<HandHistory>, ManagerError> {
        self.request(|reply| TableMessage::LastHandHistory { reply })
            .await
    }

    pub async fn shutdown(&self) -> Result<(), ManagerError> {
        self.sender
            .send(TableMessage::Shutdown)
            .await
            .map_err(|_| ManagerError::TableClosed(self.table_id))
    }
}

/// Цикл одного стола: inbox + таймер хода.
pub struct TableActor<R: RandomSource> {
    engine: TableEngine<R>,
    timer: TimeController,
    inbox: mpsc::Receiver<TableMessage>,
    events: broadcast::Sender<TableEvent>,
    private: HashMap<PlayerId, mpsc::Sender<TableEvent>>,
}

impl<R> TableActor<R>
where
    R: RandomSource + Send + 'static,
{
    pub fn new(engine: TableEngine<R>) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let (events, _) = broadcast::channel(EVENTS_CAPACITY);
        let timer = TimeController::new(engine.table().config.time);
        let handle = TableHandle {
            table_id: engine.table_id(),
            sender,
            events: events.clone(),
        };
        let actor = Self {
            engine,
            timer,
            inbox,
            events,
            private: HashMap::new(),
        };
        (actor, handle)
    }

    /// Запустить актор в фоне. Нужен работающий рантайм tokio.
    pub fn spawn(engine: TableEngine<R>) -> TableHandle {
        let (actor, handle) = Self::new(engine);
        tokio::spawn(actor.run());
        handle
    }

    pub async fn run(mut self) {
        let table_id = self.engine.table_id();
        info!(table_id, "стол запущен");

        loop {
            let deadline = self.timer.clock.deadline();
            tokio::select! {
                message = self.inbox.recv() => match message {
                    Some(TableMessage::Shutdown) | None => break,
                    Some(message) => self.handle(message),
                },
                _ = sleep_until_opt(deadline) => self.on_deadline(),
            }
        }

        info!(table_id, "стол закрыт");
    }

    fn handle(&mut self, message: TableMessage) {
        match message {
            TableMessage::Command { command, reply } => {
                let result = self.engine.execute(command);
                let result = match result {
                    Ok(events) => Ok(self.publish(events)),
                    Err(err) => {
                        self.on_error(&err);
                        Err(err)
                    }
                };
                let _ = reply.send(result);
            }
            TableMessage::Snapshot { viewer, reply } => {
                let snapshot = match viewer {
                    Some(player_id) => self.engine.snapshot_for(player_id),
                    None => self.engine.snapshot(),
                };
                let _ = reply.send(snapshot);
            }
            TableMessage::ActionRequest { reply } => {
                let request = self.engine.action_request().map(|mut r| {
                    self.stamp(&mut r, Instant::now());
                    r
                });
                let _ = reply.send(request);
            }
            TableMessage::LastHandHistory { reply } => {
                let _ = reply.send(self.engine.last_hand_history().cloned());
            }
            TableMessage::PrivateEvents { player_id, reply } => {
                let (sender, receiver) = mpsc::channel(PRIVATE_CAPACITY);
                self.private.insert(player_id, sender);
                let _ = reply.send(receiver);
            }
            TableMessage::Shutdown => {}
        }
    }

    fn on_deadline(&mut self) {
        let now = Instant::now();
        match self.timer.on_deadline(now) {
            TimeoutState::Extended {
                granted_secs,
                deadline: _,
            } => {
                let extensions = self.timer.clock.current().map(|t| t.extensions).unwrap_or(0);
                debug!(
                    table_id = self.engine.table_id(),
                    granted_secs,
                    extensions,
                    "подключён таймбанк"
                );
                if let Some(mut request) = self.engine.action_request() {
                    self.stamp(&mut request, now);
                    let _ = self.events.send(TableEvent::ActionRequired(request));
                }
            }
            TimeoutState::TimedOut(pending) => {
                match self.engine.apply_timeout(pending.seat, pending.turn_seq) {
                    Ok(events) => {
                        self.publish(events);
                    }
                    Err(err) => {
                        self.on_error(&err);
                        self.timer.arm(self.engine.pending_action(), now);
                    }
                }
            }
            TimeoutState::Ongoing | TimeoutState::NoActiveTurn => {}
        }
    }

    fn on_error(&mut self, err: &EngineError) {
        if let EngineError::TableHalted(_) = err {
            debug!(table_id = self.engine.table_id(), "стол остановлен, команда не принята");
        } else if err.is_fatal() {
            let reason = self
                .engine
                .halt_reason()
                .map(str::to_owned)
                .unwrap_or_else(|| err.to_string());
            error!(table_id = self.engine.table_id(), %reason, "стол остановлен");
            self.timer.arm(None, Instant::now());
            let _ = self.events.send(TableEvent::TableHalted { reason });
        } else {
            warn!(table_id = self.engine.table_id(), %err, "команда отклонена");
        }
    }

    /// Перевзвести таймер, проставить дедлайны и разослать события.
    /// Разослать события: публичные всем подписчикам и в ответ отправителю,
    /// приватные только в личный канал адресата.
    fn publish(&mut self, events: Vec<TableEvent>) -> Vec<TableEvent> {
        let now = Instant::now();
        for event in &events {
            match event {
                TableEvent::SeatTaken { player_id, .. } => self.timer.register_player(*player_id),
                TableEvent::SeatVacated { player_id, .. } => self.timer.forget_player(*player_id),
                _ => {}
            }
        }
        self.timer.arm(self.engine.pending_action(), now);

        let mut public = Vec::with_capacity(events.len());
        for mut event in events {
            if let Some(player_id) = event.recipient() {
                self.deliver_private(player_id, event);
                continue;
            }
            if let TableEvent::ActionRequired(request) = &mut event {
                self.stamp(request, now);
            }
            if let TableEvent::SeatVacated { player_id, .. } = &event {
                self.private.remove(player_id);
            }
            let _ = self.events.send(event.clone());
            public.push(event);
        }
        public
    }

    fn deliver_private(&mut self, player_id: PlayerId, event: TableEvent) {
        let Some(sender) = self.private.get(&player_id) else {
            return;
        };
        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(
                    table_id = self.engine.table_id(),
                    player_id, "личный канал переполнен, событие потеряно"
                );
            }
            Err(TrySendError::Closed(_)) => {
                self.private.remove(&player_id);
            }
        }
    }

    /// Дедлайн и остаток таймбанка в запросе хода, если таймер взведён на этот ход.
    fn stamp(&self, request: &mut ActionRequest, now: Instant) {
        request.time_bank_secs = self.timer.remaining_bank(request.player_id);
        request.deadline_unix_ms = self
            .timer
            .clock
            .current()
            .filter(|turn| turn.pending.turn_seq == request.turn_seq)
            .map(|turn| unix_ms_after(turn.deadline.saturating_duration_since(now)));
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn unix_ms_after(delay: Duration) -> u64 {
    (SystemTime::now() + delay)
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
