use std::collections::HashSet;

use thiserror::Error;

use crate::domain::card::{Card, Rank};

use super::hand_value::{HandCategory, HandValue};
use super::straights::{detect_straight, rank_to_bit, straight_ranks, RankMask};

/// Ошибки входных данных оценщика.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("для оценки нужно от 5 до 7 карт, передано {0}")]
    InvalidCardCount(usize),

    #[error("карта {0} встречается дважды")]
    DuplicateCard(Card),
}

/// Вычислить лучшую 5-карточную руку из карманных карт и борда (всего 5–7 карт).
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> Result<HandValue, EvalError> {
    let mut all_cards = Vec::with_capacity(hole.len() + board.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(board);
    evaluate_cards(&all_cards)
}

/// Лучшая рука среди всех 5-карточных комбинаций (для 7 карт — 21 комбинация).
pub fn evaluate_cards(cards: &[Card]) -> Result<HandValue, EvalError> {
    let n = cards.len();
    if !(5..=7).contains(&n) {
        return Err(EvalError::InvalidCardCount(n));
    }
    let mut seen = HashSet::with_capacity(n);
    for card in cards {
        if !seen.insert(*card) {
            return Err(EvalError::DuplicateCard(*card));
        }
    }

    let mut best = HandValue(0);
    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        best = best.max(evaluate_five(&five));
                    }
                }
            }
        }
    }
    Ok(best)
}

/// Оценка строго 5-карточной комбинации.
fn evaluate_five(cards: &[Card; 5]) -> HandValue {
    let mut suit_counts = [0u8; 4];
    let mut rank_counts = [0u8; 15]; // индексы 2..=14
    let mut rank_mask: RankMask = 0;

    for card in cards {
        suit_counts[card.suit.index()] += 1;
        rank_counts[card.rank.value() as usize] += 1;
        rank_mask |= rank_to_bit(card.rank);
    }

    let is_flush = suit_counts.iter().any(|&c| c == 5);
    let straight_high = detect_straight(rank_mask);

    // (count, rank), сортировка: сначала по количеству, затем по рангу, оба по убыванию.
    let mut groups: Vec<(u8, Rank)> = Rank::ALL
        .iter()
        .rev()
        .filter(|r| rank_counts[r.value() as usize] > 0)
        .map(|r| (rank_counts[r.value() as usize], *r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));

    let pattern: Vec<u8> = groups.iter().map(|(count, _)| *count).collect();
    let ranks: Vec<Rank> = groups.iter().map(|(_, rank)| *rank).collect();

    if let (true, Some(high)) = (is_flush, straight_high) {
        return HandValue::new(HandCategory::StraightFlush, &straight_ranks(high));
    }

    let category = match pattern.as_slice() {
        [4, 1] => HandCategory::FourOfAKind,
        [3, 2] => HandCategory::FullHouse,
        _ if is_flush => HandCategory::Flush,
        _ if straight_high.is_some() => HandCategory::Straight,
        [3, 1, 1] => HandCategory::ThreeOfAKind,
        [2, 2, 1] => HandCategory::TwoPair,
        [2, 1, 1, 1] => HandCategory::OnePair,
        _ => HandCategory::HighCard,
    };

    match (category, straight_high) {
        (HandCategory::Straight, Some(high)) => HandValue::new(category, &straight_ranks(high)),
        _ => HandValue::new(category, &ranks),
    }
}
