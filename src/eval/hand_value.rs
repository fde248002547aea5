use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::card::Rank;

/// Категория покерной руки по силе.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    /// Включая роял-флеш (стрит-флеш до туза).
    StraightFlush = 8,
}

impl HandCategory {
    fn from_id(id: u8) -> Option<HandCategory> {
        Some(match id {
            0 => HandCategory::HighCard,
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            8 => HandCategory::StraightFlush,
            _ => return None,
        })
    }
}

/// Сила 5-карточной руки, сравнимая между игроками.
///
/// Схема кодирования (u32):
///   [категория:4 бита][r0:4][r1:4][r2:4][r3:4][r4:4]
///
/// r0..r4 — ранги, определяющие категорию, затем кикеры по убыванию.
/// Неиспользуемые хвостовые позиции равны 0. Для стрита до пятёрки
/// (A-2-3-4-5) старшая карта — пятёрка, туз в кодировке не участвует.
/// Равные значения означают точную ничью.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(pub u32);

impl HandValue {
    /// Собрать значение из категории и значимых рангов (от старшего к младшему).
    pub fn new(category: HandCategory, ranks: &[Rank]) -> Self {
        debug_assert!(ranks.len() <= 5);
        let mut value = (category as u32) << 20;
        for (i, rank) in ranks.iter().take(5).enumerate() {
            value |= (rank.value() as u32) << (16 - 4 * i);
        }
        HandValue(value)
    }

    pub fn category(&self) -> HandCategory {
        let id = ((self.0 >> 20) & 0x0F) as u8;
        HandCategory::from_id(id).unwrap_or(HandCategory::HighCard)
    }

    /// Значимые ранги (без нулевого хвоста), от старшего к младшему.
    pub fn ranks(&self) -> Vec<Rank> {
        (0..5)
            .map(|i| ((self.0 >> (16 - 4 * i)) & 0x0F) as u8)
            .filter_map(Rank::from_value)
            .collect()
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", describe_hand(*self))
    }
}

/// Человеческое описание руки: категория и определяющие ранги.
pub fn describe_hand(value: HandValue) -> String {
    let ranks = value.ranks();
    let r = |i: usize| ranks.get(i).map(|r| r.to_string()).unwrap_or_default();
    match value.category() {
        HandCategory::HighCard => format!("High card {}", r(0)),
        HandCategory::OnePair => format!("One pair of {}", r(0)),
        HandCategory::TwoPair => format!("Two pair {} and {}", r(0), r(1)),
        HandCategory::ThreeOfAKind => format!("Three of a kind {}", r(0)),
        HandCategory::Straight => format!("Straight to {}", r(0)),
        HandCategory::Flush => format!("Flush {} high", r(0)),
        HandCategory::FullHouse => format!("Full house {} over {}", r(0), r(1)),
        HandCategory::FourOfAKind => format!("Four of a kind {}", r(0)),
        HandCategory::StraightFlush if ranks.first() == Some(&Rank::Ace) => {
            "Royal flush".to_string()
        }
        HandCategory::StraightFlush => format!("Straight flush to {}", r(0)),
    }
}
