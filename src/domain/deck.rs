use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::card::{Card, Rank, Suit};
use crate::engine::RandomSource;

/// Колода исчерпана. При фиксированных 52 картах и ≤10 местах это
/// программная ошибка, а не штатная ситуация.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("колода исчерпана")]
pub struct EmptyDeckError;

/// Ошибка при сборке колоды из заданного порядка карт.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckOrderError {
    #[error("в колоде должно быть 52 карты, передано {0}")]
    WrongSize(usize),

    #[error("карта {0} встречается дважды")]
    Duplicate(Card),
}

/// Колода карт с курсором раздачи.
///
/// Карты выдаются с позиции `cursor` вперёд; до `reset` ни одна карта
/// не выдаётся дважды.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    cursor: usize,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards, cursor: 0 }
    }

    /// Колода в заранее известном порядке (реплей записанной раздачи, тесты).
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DeckOrderError> {
        if cards.len() != 52 {
            return Err(DeckOrderError::WrongSize(cards.len()));
        }
        let mut seen = HashSet::with_capacity(52);
        for card in &cards {
            if !seen.insert(*card) {
                return Err(DeckOrderError::Duplicate(*card));
            }
        }
        Ok(Deck { cards, cursor: 0 })
    }

    /// Заново собрать 52 карты и равномерно перемешать (Fisher–Yates внутри RNG).
    pub fn reset<R: RandomSource>(&mut self, rng: &mut R) {
        *self = Deck::standard_52();
        rng.shuffle(&mut self.cards);
    }

    /// Сколько карт ещё можно выдать.
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Выдать следующую карту.
    pub fn deal(&mut self) -> Result<Card, EmptyDeckError> {
        let card = *self.cards.get(self.cursor).ok_or(EmptyDeckError)?;
        self.cursor += 1;
        Ok(card)
    }

    /// Сжечь карту: выдать и никому не показывать.
    pub fn burn(&mut self) -> Result<(), EmptyDeckError> {
        self.deal().map(|_| ())
    }

    /// Порядок карт целиком (для аудита/реплея).
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        Deck::standard_52()
    }
}
