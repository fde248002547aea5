//! Места, конфиг, снимки и история раздачи.

mod common;

use common::{engine_with, finished_hands, manual_config, player};

use poker_table_engine::api::events::TableEvent;
use poker_table_engine::domain::chips::Chips;
use poker_table_engine::domain::hand::Phase;
use poker_table_engine::domain::ledger::LedgerError;
use poker_table_engine::domain::seat::SeatStatus;
use poker_table_engine::domain::table::{ConfigError, TableConfig};
use poker_table_engine::engine::{EngineError, PlayerActionKind, PlayerIntent, TableEngine};
use poker_table_engine::infra::DeterministicRng;

//
// ====================== SIT DOWN / STAND UP ======================
//

#[test]
fn sit_down_validates_seat_player_and_buy_in() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000)], 1);

    assert_eq!(
        engine.sit_down(0, 555, Chips(500)),
        Err(EngineError::Ledger(LedgerError::SeatOccupied(0)))
    );
    assert_eq!(
        engine.sit_down(1, player(0), Chips(500)),
        Err(EngineError::Ledger(LedgerError::PlayerAlreadySeated(player(0))))
    );
    assert!(matches!(
        engine.sit_down(1, 555, Chips(0)),
        Err(EngineError::Ledger(LedgerError::InvalidBuyIn { .. }))
    ));
    assert_eq!(
        engine.sit_down(42, 555, Chips(500)),
        Err(EngineError::Ledger(LedgerError::InvalidSeat(42)))
    );
    assert_eq!(engine.total_chips(), Chips(1_000));
}

#[test]
fn buy_in_outside_configured_range_is_rejected() {
    let mut engine =
        TableEngine::new(1, TableConfig::default(), DeterministicRng::from_u64(1)).unwrap();
    // По умолчанию бай-ин 400..=10000 при BB = 20.
    assert!(engine.sit_down(0, 1, Chips(399)).is_err());
    assert!(engine.sit_down(0, 1, Chips(10_001)).is_err());
    assert!(engine.sit_down(0, 1, Chips(400)).is_ok());
}

#[test]
fn stand_up_between_hands_cashes_out_immediately() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 700)], 1);

    let events = engine.stand_up(1).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        TableEvent::SeatVacated { seat: 1, cash_out: Chips(700), .. }
    )));
    assert!(engine.table().is_seat_empty(1));
    assert_eq!(engine.total_chips(), Chips(1_000));

    assert_eq!(
        engine.stand_up(1),
        Err(EngineError::Ledger(LedgerError::EmptySeat(1)))
    );
    assert_eq!(engine.start_hand(), Err(EngineError::NotEnoughPlayers));
}

/// Олл-ин место встаёт посреди раздачи: фишки остаются в банке,
/// место освобождается только после выплаты.
#[test]
fn all_in_seat_standing_up_stays_in_pot_until_payout() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 100), (1, 1_000), (2, 1_000)], 2);
    engine.start_hand().unwrap();
    engine
        .apply_intent(PlayerIntent::new(0, PlayerActionKind::AllIn))
        .unwrap();

    engine.stand_up(0).unwrap();
    let seat = engine.table().seats.seat(0).unwrap();
    assert_eq!(seat.status, SeatStatus::AllIn);
    assert!(seat.leaving);

    engine
        .apply_intent(PlayerIntent::new(1, PlayerActionKind::Call))
        .unwrap();
    let mut events = engine
        .apply_intent(PlayerIntent::new(2, PlayerActionKind::Call))
        .unwrap();

    // Дальше торговля между 1 и 2 — чеки до конца.
    while let Some(pending) = engine.pending_action() {
        events = engine
            .apply_intent(PlayerIntent::new(pending.seat, PlayerActionKind::Check))
            .unwrap();
    }

    assert_eq!(finished_hands(&events), 1);
    assert!(engine.table().is_seat_empty(0));
    let vacated: Chips = events
        .iter()
        .filter_map(|e| match e {
            TableEvent::SeatVacated { seat: 0, cash_out, .. } => Some(*cash_out),
            _ => None,
        })
        .sum();
    let remaining = engine.table().seats.total_stacks();
    assert_eq!(remaining + vacated, Chips(2_100));
    assert_eq!(engine.total_chips(), remaining);
}

//
// ====================== SIT OUT / SIT IN ======================
//

#[test]
fn sitting_out_seat_skips_hands_until_sit_in() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 1_000), (2, 1_000)], 3);
    engine.sit_out(2).unwrap();

    engine.start_hand().unwrap();
    let seat2 = engine.table().seats.seat(2).unwrap();
    assert_eq!(seat2.status, SeatStatus::SittingOut);
    assert!(seat2.hole_cards.is_empty());
    // Хедз-ап между 0 и 1: кнопка на малом блайнде.
    assert_eq!(engine.pending_action().unwrap().seat, 0);

    engine.sit_in(2).unwrap();
    engine
        .apply_intent(PlayerIntent::new(0, PlayerActionKind::Fold))
        .unwrap();
    assert_eq!(engine.table().phase, Phase::Waiting);
    assert_eq!(engine.table().dealer_button, Some(1));

    engine.start_hand().unwrap();
    assert_eq!(engine.table().seats.seat(2).unwrap().status, SeatStatus::Active);
    // Кнопка 1, SB 2, BB 0, первым ходит 1.
    assert_eq!(engine.pending_action().unwrap().seat, 1);
    assert_eq!(engine.table().seats.seat(0).unwrap().committed_round, Chips(20));
}

#[test]
fn auto_start_deals_when_second_player_sits() {
    let config = TableConfig {
        auto_start: true,
        ..manual_config(10, 20)
    };
    let mut engine = TableEngine::new(1, config, DeterministicRng::from_u64(4)).unwrap();

    let events = engine.sit_down(0, 1, Chips(1_000)).unwrap();
    assert!(!events.iter().any(|e| matches!(e, TableEvent::HandStarted { .. })));

    let events = engine.sit_down(3, 2, Chips(1_000)).unwrap();
    assert!(events.iter().any(|e| matches!(e, TableEvent::HandStarted { .. })));
    assert!(engine.pending_action().is_some());

    // Следующая раздача стартует сама после выплаты.
    let pending = engine.pending_action().unwrap();
    let events = engine
        .apply_intent(PlayerIntent::new(pending.seat, PlayerActionKind::Fold))
        .unwrap();
    assert_eq!(finished_hands(&events), 1);
    assert!(events.iter().any(|e| matches!(e, TableEvent::HandStarted { hand_id: 2, .. })));
}

//
// ====================== SNAPSHOTS / HISTORY ======================
//

#[test]
fn public_snapshot_hides_hole_cards_owner_sees_own() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 1_000)], 5);
    let events = engine.start_hand().unwrap();

    let private: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, TableEvent::HoleCards { .. }))
        .collect();
    assert_eq!(private.len(), 2);
    assert!(private.iter().all(|e| e.recipient().is_some()));

    let public = engine.snapshot();
    assert!(public.seats.iter().all(|s| s.hole_cards.is_none()));
    assert!(public.seat(0).unwrap().has_cards);

    let mine = engine.snapshot_for(player(0));
    assert_eq!(mine.seat(0).unwrap().hole_cards.as_ref().map(Vec::len), Some(2));
    assert!(mine.seat(1).unwrap().hole_cards.is_none());
}

#[test]
fn showdown_reveals_cards_in_public_snapshot() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 1_000)], 6);
    engine.start_hand().unwrap();
    engine
        .apply_intent(PlayerIntent::new(0, PlayerActionKind::Call))
        .unwrap();
    while let Some(pending) = engine.pending_action() {
        engine
            .apply_intent(PlayerIntent::new(pending.seat, PlayerActionKind::Check))
            .unwrap();
    }

    let public = engine.snapshot();
    assert!(public
        .seats
        .iter()
        .filter(|s| s.player_id.is_some())
        .all(|s| s.hole_cards.is_some()));
    assert_eq!(public.board.len(), 5);
}

#[test]
fn hand_history_records_the_finished_hand_without_snapshots() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 1_000)], 7);
    assert!(engine.last_hand_history().is_none());

    engine.start_hand().unwrap();
    engine
        .apply_intent(PlayerIntent::new(0, PlayerActionKind::Fold))
        .unwrap();

    let history = engine.last_hand_history().unwrap();
    assert_eq!(history.hand_id, 1);
    assert!(history.iter().all(|e| !e.is_snapshot()));
    assert!(matches!(history.iter().next(), Some(TableEvent::HandStarted { .. })));
    assert!(history
        .iter()
        .any(|e| matches!(e, TableEvent::ActionTaken { seat: 0, .. })));
    assert!(matches!(history.iter().last(), Some(TableEvent::HandFinished { hand_id: 1 })));
    for (i, e) in history.events.iter().enumerate() {
        assert_eq!(e.index as usize, i);
    }
}

//
// ====================== TIMEOUTS (ENGINE) ======================
//

#[test]
fn timeout_checks_when_possible_and_folds_otherwise() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 1_000)], 8);
    engine.start_hand().unwrap();

    // Кнопка должна 10: таймаут = fold.
    let pending = engine.pending_action().unwrap();
    assert_eq!(
        engine.apply_timeout(pending.seat, pending.turn_seq + 1),
        Err(EngineError::StaleTimeout)
    );
    let events = engine.apply_timeout(pending.seat, pending.turn_seq).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        TableEvent::ActionTaken { seat: 0, action: PlayerActionKind::Fold, timed_out: true, .. }
    )));
    // Повтор того же таймаута уже устарел.
    assert_eq!(
        engine.apply_timeout(pending.seat, pending.turn_seq),
        Err(EngineError::StaleTimeout)
    );

    // Новая раздача: кнопка 1 коллирует, у BB таймаут = check.
    engine.start_hand().unwrap();
    let pending = engine.pending_action().unwrap();
    engine
        .apply_intent(PlayerIntent::new(pending.seat, PlayerActionKind::Call))
        .unwrap();
    let pending = engine.pending_action().unwrap();
    let events = engine.apply_timeout(pending.seat, pending.turn_seq).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        TableEvent::ActionTaken { action: PlayerActionKind::Check, timed_out: true, .. }
    )));
}

//
// ====================== CONFIG ======================
//

#[test]
fn invalid_config_is_rejected() {
    let bad_seats = TableConfig {
        max_seats: 11,
        ..TableConfig::default()
    };
    assert!(matches!(
        TableEngine::new(1, bad_seats, DeterministicRng::from_u64(1)),
        Err(EngineError::Config(ConfigError::InvalidSeatCount(11)))
    ));

    assert!(matches!(
        TableConfig::from_json_str(r#"{ "stakes": { "small_blind": 30, "big_blind": 20 } }"#),
        Err(ConfigError::InvalidBlinds { .. })
    ));
    assert!(matches!(
        TableConfig::from_json_str(r#"{ "min_buy_in": 500, "max_buy_in": 100 }"#),
        Err(ConfigError::InvalidBuyInRange { .. })
    ));
    assert!(matches!(
        TableConfig::from_json_str(r#"{ "time": { "base_action_secs": 0 } }"#),
        Err(ConfigError::InvalidTimeRules)
    ));
    assert!(matches!(
        TableConfig::from_json_str("not json"),
        Err(ConfigError::Parse(_))
    ));

    let config = TableConfig::from_json_str(r#"{ "time": { "base_action_secs": 5 } }"#).unwrap();
    assert_eq!(config.time.base_action_secs, 5);
    assert_eq!(config.time.bank_per_player_secs, 60);
}
