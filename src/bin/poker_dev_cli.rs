// src/bin/poker_dev_cli.rs
//
// Dev-CLI: несколько столов параллельно, за каждым – простые боты.
// Запуск: poker_dev_cli [раздач_на_стол] [seed]

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tracing::{info, warn};

use poker_table_engine::api::events::TableEvent;
use poker_table_engine::domain::chips::Chips;
use poker_table_engine::domain::table::{TableConfig, TableStakes};
use poker_table_engine::domain::{PlayerId, TableId};
use poker_table_engine::engine::{LegalAction, PlayerActionKind, PlayerIntent};
use poker_table_engine::infra::{IdGenerator, RngSeed, SeedChainRng};
use poker_table_engine::runtime::{ManagerError, TableHandle, TableManager};
use poker_table_engine::time_ctrl::TimeRules;

const TABLES: u64 = 3;
const BUY_IN: Chips = Chips(2_000);
const TABLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Манера игры бота.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum BotStyle {
    /// Чаще коллирует, иногда повышает минимум.
    Caller,
    /// Повышает и идёт в олл-ин заметно чаще.
    Aggressive,
    /// Никогда не отвечает – ходит за него таймер.
    Sleepy,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let hands_per_table: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(25);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    info!(hands_per_table, seed, "poker_dev_cli: стартуем");

    let ids = IdGenerator::new();
    let mut manager = TableManager::new();
    let base_seed = RngSeed::from_u64(seed);

    let mut monitors = Vec::new();
    for n in 0..TABLES {
        let config = TableConfig {
            max_seats: 6,
            stakes: TableStakes::new(Chips(10), Chips(20)),
            min_buy_in: Chips(400),
            max_buy_in: Chips(10_000),
            // Короткий таймер, чтобы сонный бот не тормозил симуляцию.
            time: TimeRules::new(1, 2, 1),
            auto_start: true,
        };
        // ID стола выдаёт менеджер по порядку, так что seed-цепочку строим по номеру.
        let rng = SeedChainRng::new(base_seed.clone(), n + 1);
        let handle = match manager.create_table(config, rng) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(%err, "не удалось создать стол");
                continue;
            }
        };

        let monitor = handle.subscribe();
        let players = 3 + n as u8;
        for seat in 0..players {
            let player_id = ids.next_player_id();
            let style = match (n, seat) {
                (0, 0) => BotStyle::Sleepy,
                (_, s) if s % 2 == 1 => BotStyle::Aggressive,
                _ => BotStyle::Caller,
            };
            // Подписка до посадки: первая раздача стартует сама на втором игроке.
            let events = handle.subscribe();
            tokio::spawn(run_bot(
                handle.clone(),
                events,
                player_id,
                style,
                seed ^ player_id,
            ));
            if let Err(err) = handle.sit_down(seat, player_id, BUY_IN).await {
                warn!(table_id = handle.table_id(), seat, %err, "бот не смог сесть");
            }
        }

        let expected = BUY_IN.0 * players as u64;
        monitors.push(tokio::spawn(watch_table(
            handle,
            monitor,
            hands_per_table,
            Chips(expected),
        )));
    }

    for monitor in monitors {
        match monitor.await {
            Ok(table_id) => {
                if let Err(err) = manager.close_table(table_id).await {
                    warn!(table_id, %err, "стол уже закрыт");
                }
            }
            Err(err) => warn!(%err, "монитор стола упал"),
        }
    }
    manager.shutdown_all().await;
    info!("poker_dev_cli: готово");
}

/// Ждать `hands` завершённых раздач (или пока играть некому), затем
/// напечатать итог и проверить, что фишки на месте.
async fn watch_table(
    handle: TableHandle,
    mut events: Receiver<TableEvent>,
    hands: u64,
    expected: Chips,
) -> TableId {
    let table_id = handle.table_id();
    let mut finished = 0u64;

    let wait = async {
        loop {
            match events.recv().await {
                Ok(TableEvent::HandFinished { hand_id }) => {
                    finished += 1;
                    info!(table_id, hand_id, finished, "раздача сыграна");
                    if finished >= hands {
                        break;
                    }
                }
                Ok(TableEvent::Snapshot(s)) if finished > 0 && !s.phase.is_hand_running() => {
                    let occupied = s.seats.iter().filter(|v| v.player_id.is_some()).count();
                    if occupied < 2 {
                        info!(table_id, "играть больше некому");
                        break;
                    }
                }
                Ok(TableEvent::TableHalted { reason }) => {
                    warn!(table_id, %reason, "стол остановлен");
                    break;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(table_id, skipped, "монитор отстал от событий");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };
    if tokio::time::timeout(TABLE_TIMEOUT, wait).await.is_err() {
        warn!(table_id, "симуляция стола не уложилась во время");
    }

    match handle.snapshot(None).await {
        Ok(snapshot) => {
            println!();
            println!("====== TABLE {table_id} | раздач: {finished} | фаза: {} ======", snapshot.phase);
            for seat in snapshot.seats.iter().filter(|s| s.player_id.is_some()) {
                println!(
                    "  seat {} | player {:?} | stack {} | {:?}",
                    seat.seat, seat.player_id, seat.stack, seat.status
                );
            }
            let on_table: Chips =
                snapshot.seats.iter().map(|s| s.stack).sum::<Chips>() + snapshot.pot_total;
            println!("  фишек на столе: {on_table} (вошло {expected})");
        }
        Err(err) => warn!(table_id, %err, "не удалось снять снимок"),
    }
    table_id
}

async fn run_bot(
    handle: TableHandle,
    mut events: Receiver<TableEvent>,
    player_id: PlayerId,
    style: BotStyle,
    seed: u64,
) {
    let mut rng = StdRng::seed_from_u64(seed);
    loop {
        match events.recv().await {
            Ok(TableEvent::ActionRequired(request)) if request.player_id == player_id => {
                if style == BotStyle::Sleepy {
                    continue;
                }
                // Продление таймбанком присылает тот же ход повторно.
                let Some(action) = choose_action(&request.legal_actions, style, &mut rng) else {
                    continue;
                };
                match handle.submit(PlayerIntent::new(request.seat, action)).await {
                    Ok(_) => {}
                    Err(ManagerError::TableClosed(_)) => break,
                    Err(err) => warn!(player_id, %err, "ход бота отклонён"),
                }
            }
            Ok(TableEvent::SeatVacated { player_id: p, .. }) if p == player_id => break,
            Ok(TableEvent::TableHalted { .. }) | Err(RecvError::Closed) => break,
            Ok(_) | Err(RecvError::Lagged(_)) => {}
        }
    }
}

fn choose_action(
    legal: &[LegalAction],
    style: BotStyle,
    rng: &mut StdRng,
) -> Option<PlayerActionKind> {
    let raise_chance = match style {
        BotStyle::Aggressive => 0.35,
        _ => 0.1,
    };
    let roll: f64 = rng.gen();

    let aggressive = legal.iter().find_map(|a| match *a {
        LegalAction::Bet { min, .. } => Some(PlayerActionKind::Bet(min)),
        LegalAction::Raise { min, .. } => Some(PlayerActionKind::Raise(min)),
        _ => None,
    });
    if roll < raise_chance {
        if let Some(action) = aggressive {
            return Some(action);
        }
    }
    if style == BotStyle::Aggressive && roll > 0.97 && legal.iter().any(|a| matches!(a, LegalAction::AllIn { .. })) {
        return Some(PlayerActionKind::AllIn);
    }

    if legal.contains(&LegalAction::Check) {
        return Some(PlayerActionKind::Check);
    }
    if roll > 0.85 {
        return Some(PlayerActionKind::Fold);
    }
    legal.iter().find_map(|a| match a {
        LegalAction::Call { .. } => Some(PlayerActionKind::Call),
        LegalAction::AllIn { .. } => Some(PlayerActionKind::AllIn),
        _ => None,
    })
    .or_else(|| legal.contains(&LegalAction::Fold).then_some(PlayerActionKind::Fold))
}
