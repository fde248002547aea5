//! Общие утилиты интеграционных тестов.

#![allow(dead_code)]

use poker_table_engine::api::events::TableEvent;
use poker_table_engine::domain::card::{parse_cards, Card};
use poker_table_engine::domain::chips::Chips;
use poker_table_engine::domain::deck::Deck;
use poker_table_engine::domain::table::{TableConfig, TableStakes};
use poker_table_engine::domain::{PlayerId, SeatIndex};
use poker_table_engine::engine::TableEngine;
use poker_table_engine::infra::DeterministicRng;

/// Конфиг для тестов: без автостарта, бай-ин от 1 фишки.
pub fn manual_config(sb: u64, bb: u64) -> TableConfig {
    TableConfig {
        stakes: TableStakes::new(Chips(sb), Chips(bb)),
        min_buy_in: Chips(1),
        max_buy_in: Chips(1_000_000),
        auto_start: false,
        ..TableConfig::default()
    }
}

/// Игрок на месте `seat` получает id `100 + seat`.
pub fn player(seat: SeatIndex) -> PlayerId {
    100 + seat as PlayerId
}

/// Движок с игроками на местах `(seat, stack)`.
pub fn engine_with(
    config: TableConfig,
    seats: &[(SeatIndex, u64)],
    seed: u64,
) -> TableEngine<DeterministicRng> {
    let mut engine = TableEngine::new(1, config, DeterministicRng::from_u64(seed)).unwrap();
    for &(seat, stack) in seats {
        engine.sit_down(seat, player(seat), Chips(stack)).unwrap();
    }
    engine
}

/// Колода, начинающаяся с `top` (в порядке раздачи), дальше – остальные
/// карты в стандартном порядке.
pub fn stacked_deck(top: &str) -> Deck {
    let mut cards: Vec<Card> = parse_cards(top).unwrap();
    for card in Deck::standard_52().cards() {
        if !cards.contains(card) {
            cards.push(*card);
        }
    }
    Deck::from_cards(cards).unwrap()
}

/// Сколько раздач завершилось в пачке событий.
pub fn finished_hands(events: &[TableEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, TableEvent::HandFinished { .. }))
        .count()
}

/// Выплаты всех банков по местам.
pub fn payouts(events: &[TableEvent]) -> Vec<(SeatIndex, Chips)> {
    events
        .iter()
        .filter_map(|e| match e {
            TableEvent::HandResult(r) => Some(r.payouts.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}

/// Сумма выплат месту за раздачу.
pub fn paid_to(events: &[TableEvent], seat: SeatIndex) -> Chips {
    payouts(events)
        .into_iter()
        .filter(|(s, _)| *s == seat)
        .map(|(_, amount)| amount)
        .sum()
}
