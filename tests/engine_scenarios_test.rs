//! Сценарии раздач через настоящий `TableEngine`.
//!
//! Здесь проверяем:
//! - хедз-ап префлоп: блайнды и первый ход у кнопки;
//! - олл-ины [50, 150, 150] → основной банк 150 и сайд-пот 200;
//! - сплит нечётного банка 101 → 51/50, остаток первому по часовой от дилера;
//! - порядок хода пропускает сфолдившее место;
//! - раздача без вскрытия, когда все, кроме одного, сбросили.

mod common;

use common::{engine_with, finished_hands, manual_config, paid_to, player, stacked_deck};

use poker_table_engine::api::events::TableEvent;
use poker_table_engine::domain::chips::Chips;
use poker_table_engine::domain::hand::{Phase, Street};
use poker_table_engine::domain::seat::SeatStatus;
use poker_table_engine::engine::{EngineError, LegalAction, PlayerActionKind, PlayerIntent};
use poker_table_engine::eval::HandCategory;

fn act(seat: u8, action: PlayerActionKind) -> PlayerIntent {
    PlayerIntent::new(seat, action)
}

//
// ====================== HEADS-UP PREFLOP ======================
//

/// Стеки [1000, 1000], блайнды 10/20, кнопка на месте 0.
/// Кнопка ставит SB=10, место 1 — BB=20, первой ходит кнопка, ставка 20.
#[test]
fn heads_up_button_posts_small_blind_and_acts_first() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 1_000)], 1);

    let events = engine.start_hand().unwrap();

    let started = events
        .iter()
        .find_map(|e| match e {
            TableEvent::HandStarted {
                dealer_button,
                small_blind,
                big_blind,
                ..
            } => Some((*dealer_button, *small_blind, *big_blind)),
            _ => None,
        })
        .expect("HandStarted должен быть в событиях");
    assert_eq!(started, (0, (0, Chips(10)), (1, Chips(20))));

    let pending = engine.pending_action().unwrap();
    assert_eq!(pending.seat, 0);
    assert_eq!(pending.player_id, player(0));

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, Phase::Betting(Street::PreFlop));
    assert_eq!(snapshot.bet_to_match, Chips(20));
    assert_eq!(snapshot.pot_total, Chips(30));
    assert_eq!(snapshot.current_actor, Some(0));

    let legal = engine.legal_actions(0);
    assert!(legal.contains(&LegalAction::Call { amount: Chips(10) }));
    assert!(legal.contains(&LegalAction::Raise {
        min: Chips(40),
        max: Chips(1_000)
    }));
    assert!(!legal.contains(&LegalAction::Check));

    // Последнее событие пачки — запрос хода кнопке.
    match events.last() {
        Some(TableEvent::ActionRequired(req)) => {
            assert_eq!(req.seat, 0);
            assert_eq!(req.to_call, Chips(10));
        }
        other => panic!("ожидали ActionRequired, получили {other:?}"),
    }
}

/// После колла кнопки BB закрывает префлоп чеком, а на флопе первым
/// ходит уже не кнопка, а BB.
#[test]
fn heads_up_big_blind_acts_first_after_flop() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 1_000)], 2);
    engine.start_hand().unwrap();

    engine.apply_intent(act(0, PlayerActionKind::Call)).unwrap();
    assert_eq!(engine.pending_action().unwrap().seat, 1);

    let events = engine.apply_intent(act(1, PlayerActionKind::Check)).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        TableEvent::BoardDealt { street: Street::Flop, cards } if cards.len() == 3
    )));
    assert_eq!(engine.table().board.len(), 3);
    assert_eq!(engine.pending_action().unwrap().seat, 1);
    assert_eq!(engine.snapshot().bet_to_match, Chips::ZERO);
}

//
// ====================== SIDE POTS ======================
//

/// Стеки [50, 150, 150], все в олл-ин на префлопе по порядку.
/// Основной банк 50×3 = 150 на троих, сайд-пот (150−50)×2 = 200 на двоих.
#[test]
fn all_in_50_150_150_builds_main_and_side_pot() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 50), (1, 150), (2, 150)], 3);
    // Раздача: 1,2,0,1,2,0, бёрн, флоп, бёрн, тёрн, бёрн, ривер.
    let deck = stacked_deck("Kh Qh Ah Ks Qs As 3c 2c 7d 9h 3d 4s 3h Jd");
    engine.start_hand_with_deck(deck).unwrap();
    assert_eq!(engine.pending_action().unwrap().seat, 0);

    engine.apply_intent(act(0, PlayerActionKind::AllIn)).unwrap();
    engine.apply_intent(act(1, PlayerActionKind::AllIn)).unwrap();

    // Перед последним ходом банк ещё не разыгран: 50 + 150 + BB 20.
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.pot_total, Chips(220));

    let events = engine.apply_intent(act(2, PlayerActionKind::AllIn)).unwrap();

    let results: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            TableEvent::HandResult(r) => Some(r.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].pot_id, 0);
    assert_eq!(results[0].amount, Chips(150));
    assert_eq!(results[0].winning_seats, vec![0]);
    assert_eq!(
        results[0].winning_hand.map(|h| h.category()),
        Some(HandCategory::OnePair)
    );

    assert_eq!(results[1].pot_id, 1);
    assert_eq!(results[1].amount, Chips(200));
    assert_eq!(results[1].winning_seats, vec![1]);

    // Доска открыта до ривера, несмотря на отсутствие торговли.
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, TableEvent::BoardDealt { .. }))
            .count(),
        3
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, TableEvent::ShowdownReveal { .. }))
            .count(),
        3
    );

    // Место 2 проиграло всё и освобождено.
    assert!(events.iter().any(|e| matches!(
        e,
        TableEvent::SeatVacated { seat: 2, cash_out: Chips(0), .. }
    )));
    let seats = &engine.table().seats;
    assert_eq!(seats.seat(0).unwrap().stack, Chips(150));
    assert_eq!(seats.seat(1).unwrap().stack, Chips(200));
    assert_eq!(engine.total_chips(), Chips(350));
    assert_eq!(finished_hands(&events), 1);
}

//
// ====================== SPLIT POT ======================
//

/// Банк 101 между двумя одинаковыми стритами (оба играют борд).
/// Кнопка на 0, порядок выплаты 1 → 2 → 0: остаток достаётся месту 2.
#[test]
fn odd_split_pot_remainder_goes_first_clockwise_from_dealer() {
    let mut engine = engine_with(manual_config(1, 2), &[(0, 1_000), (1, 1_000), (2, 1_000)], 4);
    let deck = stacked_deck("4c 2d 2c 5d 3h 3d 9s Ah Kd Qc 9h Js 9d Tc");
    engine.start_hand_with_deck(deck).unwrap();

    engine.apply_intent(act(0, PlayerActionKind::Call)).unwrap();
    engine.apply_intent(act(1, PlayerActionKind::Fold)).unwrap();
    engine.apply_intent(act(2, PlayerActionKind::Check)).unwrap();

    // Флоп: первым ходит место 2 (место 1 сбросило).
    assert_eq!(engine.pending_action().unwrap().seat, 2);
    engine
        .apply_intent(act(2, PlayerActionKind::Bet(Chips(48))))
        .unwrap();
    engine.apply_intent(act(0, PlayerActionKind::Call)).unwrap();
    assert_eq!(engine.snapshot().pot_total, Chips(101));

    // Тёрн и ривер — чеки.
    engine.apply_intent(act(2, PlayerActionKind::Check)).unwrap();
    engine.apply_intent(act(0, PlayerActionKind::Check)).unwrap();
    engine.apply_intent(act(2, PlayerActionKind::Check)).unwrap();
    let events = engine.apply_intent(act(0, PlayerActionKind::Check)).unwrap();

    let result = events
        .iter()
        .find_map(|e| match e {
            TableEvent::HandResult(r) => Some(r.clone()),
            _ => None,
        })
        .expect("должен быть HandResult");
    assert_eq!(result.amount, Chips(101));
    assert_eq!(result.winning_seats, vec![2, 0]);
    assert_eq!(
        result.winning_hand.map(|h| h.category()),
        Some(HandCategory::Straight)
    );

    assert_eq!(paid_to(&events, 2), Chips(51));
    assert_eq!(paid_to(&events, 0), Chips(50));
    assert_eq!(paid_to(&events, 1), Chips::ZERO);

    let seats = &engine.table().seats;
    assert_eq!(seats.seat(0).unwrap().stack, Chips(1_000));
    assert_eq!(seats.seat(1).unwrap().stack, Chips(999));
    assert_eq!(seats.seat(2).unwrap().stack, Chips(1_001));
}

//
// ====================== TURN ORDER ======================
//

/// [A активен, B сбросил, C активен], дилер на A.
/// После фолда B очередь ходит только между A и C.
#[test]
fn turn_order_skips_folded_seat() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 1_000), (2, 1_000)], 5);
    engine.start_hand().unwrap();

    let mut order = vec![engine.pending_action().unwrap().seat];
    engine
        .apply_intent(act(0, PlayerActionKind::Raise(Chips(40))))
        .unwrap();
    order.push(engine.pending_action().unwrap().seat);
    engine.apply_intent(act(1, PlayerActionKind::Fold)).unwrap();

    // Дальше: C, A, C, A ... до конца раздачи — чек, если можно, иначе колл.
    let mut after_fold = Vec::new();
    while let Some(pending) = engine.pending_action() {
        after_fold.push(pending.seat);
        let legal = engine.legal_actions(pending.seat);
        let action = if legal.contains(&LegalAction::Check) {
            PlayerActionKind::Check
        } else {
            PlayerActionKind::Call
        };
        engine.apply_intent(act(pending.seat, action)).unwrap();
    }

    assert_eq!(order, vec![0, 1]);
    // Префлоп: C коллирует; флоп, тёрн, ривер: C, затем A.
    assert_eq!(after_fold, vec![2, 2, 0, 2, 0, 2, 0]);
    assert!(!after_fold.contains(&1));
    assert_eq!(engine.table().phase, Phase::Waiting);
}

//
// ====================== UNCONTESTED ======================
//

/// Все сбросили до BB: банк забирается без вскрытия и без руки-победителя.
#[test]
fn everyone_folds_big_blind_takes_pot_without_showdown() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 1_000), (2, 1_000)], 6);
    engine.start_hand().unwrap();

    engine.apply_intent(act(0, PlayerActionKind::Fold)).unwrap();
    let events = engine.apply_intent(act(1, PlayerActionKind::Fold)).unwrap();

    assert!(!events
        .iter()
        .any(|e| matches!(e, TableEvent::ShowdownReveal { .. })));
    let result = events
        .iter()
        .find_map(|e| match e {
            TableEvent::HandResult(r) => Some(r.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(result.winning_seats, vec![2]);
    assert_eq!(result.amount, Chips(30));
    assert_eq!(result.winning_hand, None);

    assert_eq!(engine.table().seats.seat(2).unwrap().stack, Chips(1_010));
    // Кнопка уехала на следующее занятое место.
    assert_eq!(engine.table().dealer_button, Some(1));
    assert_eq!(engine.table().phase, Phase::Waiting);
}

//
// ====================== VALIDATION ======================
//

/// Недопустимые намерения отклоняются без изменения состояния.
#[test]
fn illegal_intents_are_rejected_without_side_effects() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 1_000), (2, 1_000)], 7);
    engine.start_hand().unwrap();
    let before = engine.snapshot();

    assert_eq!(
        engine.apply_intent(act(1, PlayerActionKind::Call)),
        Err(EngineError::NotPlayersTurn(1))
    );
    assert!(matches!(
        engine.apply_intent(act(0, PlayerActionKind::Check)),
        Err(EngineError::CannotCheck { .. })
    ));
    assert_eq!(
        engine.apply_intent(act(0, PlayerActionKind::Bet(Chips(60)))),
        Err(EngineError::CannotBet)
    );
    assert!(matches!(
        engine.apply_intent(act(0, PlayerActionKind::Raise(Chips(30)))),
        Err(EngineError::BetTooSmall { .. })
    ));
    assert!(matches!(
        engine.apply_intent(act(0, PlayerActionKind::Raise(Chips(5_000)))),
        Err(EngineError::AmountExceedsStack { .. })
    ));

    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.table().seats.seat(0).unwrap().status, SeatStatus::Active);
}

/// Неполный олл-ин не переоткрывает торговлю тому, кто уже ходил.
#[test]
fn short_all_in_does_not_reopen_raising() {
    // Места: 0 — кнопка (1000), 1 — SB (1000), 2 — BB (1000), 3 — короткий (130).
    let mut engine = engine_with(
        manual_config(10, 20),
        &[(0, 1_000), (1, 1_000), (2, 1_000), (3, 130)],
        8,
    );
    engine.start_hand().unwrap();
    // Кнопка 0, SB 1, BB 2, первым ходит место 3.
    assert_eq!(engine.pending_action().unwrap().seat, 3);

    engine.apply_intent(act(3, PlayerActionKind::Call)).unwrap();
    engine
        .apply_intent(act(0, PlayerActionKind::Raise(Chips(100))))
        .unwrap();
    engine.apply_intent(act(1, PlayerActionKind::Fold)).unwrap();
    engine.apply_intent(act(2, PlayerActionKind::Fold)).unwrap();

    // Место 3: олл-ин до 130 — прирост 30 меньше минимального рейза 80.
    engine.apply_intent(act(3, PlayerActionKind::AllIn)).unwrap();

    assert_eq!(engine.pending_action().unwrap().seat, 0);
    let legal = engine.legal_actions(0);
    assert!(legal.contains(&LegalAction::Call { amount: Chips(30) }));
    assert!(!legal.iter().any(|a| matches!(a, LegalAction::Raise { .. })));
    assert_eq!(
        engine.apply_intent(act(0, PlayerActionKind::Raise(Chips(400)))),
        Err(EngineError::RaiseNotReopened)
    );

    engine.apply_intent(act(0, PlayerActionKind::Call)).unwrap();
    assert_eq!(engine.table().phase, Phase::Waiting);
    assert_eq!(engine.total_chips(), Chips(3_130));
}

//
// ====================== SHORT BIG BLIND ======================
//

/// BB в олл-ине на 5 при блайндах 10/20: колл всё равно до полного BB.
#[test]
fn short_big_blind_does_not_lower_the_call() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 1_000), (2, 5)], 9);
    engine.start_hand().unwrap();

    assert_eq!(engine.table().seats.seat(2).unwrap().status, SeatStatus::AllIn);
    assert_eq!(engine.pending_action().unwrap().seat, 0);
    assert_eq!(engine.snapshot().bet_to_match, Chips(20));
    let legal = engine.legal_actions(0);
    assert!(legal.contains(&LegalAction::Call { amount: Chips(20) }));
    assert!(legal.contains(&LegalAction::Raise {
        min: Chips(40),
        max: Chips(1_000)
    }));

    engine.apply_intent(act(0, PlayerActionKind::Call)).unwrap();
    assert_eq!(engine.pending_action().unwrap().seat, 1);
    assert!(engine
        .legal_actions(1)
        .contains(&LegalAction::Call { amount: Chips(10) }));
    engine.apply_intent(act(1, PlayerActionKind::Call)).unwrap();
    assert_eq!(
        engine.table().phase,
        Phase::Betting(Street::Flop),
        "префлоп закрыт: все живые уравняли 20"
    );

    while let Some(pending) = engine.pending_action() {
        engine
            .apply_intent(act(pending.seat, PlayerActionKind::Check))
            .unwrap();
    }
    assert_eq!(engine.table().phase, Phase::Waiting);
    assert_eq!(engine.total_chips(), Chips(2_005));
}

/// Все сбросили до SB, а BB в олл-ине меньше SB: SB отвечать некому,
/// борд открывается без торговли.
#[test]
fn small_blind_covering_short_all_in_does_not_act() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 1_000), (2, 5)], 10);
    engine.start_hand().unwrap();

    let events = engine.apply_intent(act(0, PlayerActionKind::Fold)).unwrap();
    assert!(engine.pending_action().is_none());
    assert!(events.iter().any(|e| matches!(
        e,
        TableEvent::BoardDealt {
            street: Street::River,
            ..
        }
    )));
    assert_eq!(finished_hands(&events), 1);
    assert_eq!(engine.total_chips(), Chips(2_005));
}

/// Хедз-ап: BB в олл-ине на 5, кнопка уже поставила 10 — раздача
/// доигрывается без единого хода.
#[test]
fn heads_up_short_big_blind_runs_out_immediately() {
    let mut engine = engine_with(manual_config(10, 20), &[(0, 1_000), (1, 5)], 11);
    let events = engine.start_hand().unwrap();

    assert!(engine.pending_action().is_none());
    assert!(!events
        .iter()
        .any(|e| matches!(e, TableEvent::ActionRequired(_))));
    assert_eq!(finished_hands(&events), 1);
    assert_eq!(engine.table().phase, Phase::Waiting);
    assert_eq!(engine.total_chips(), Chips(1_005));
}
