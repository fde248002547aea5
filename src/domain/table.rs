use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::ledger::{BuyInLimits, SeatLedger};
use crate::domain::{HandId, SeatIndex, TableId};
use crate::time_ctrl::TimeRules;

/// Больше мест не поместится в колоду: 2 карты на место + 5 борда + 3 бёрна.
pub const MAX_SEATS_LIMIT: u8 = 10;

/// Ошибки конфигурации стола.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("число мест должно быть в диапазоне 2..={MAX_SEATS_LIMIT}, получено {0}")]
    InvalidSeatCount(u8),

    #[error("блайнды заданы неверно: SB={small}, BB={big}")]
    InvalidBlinds { small: Chips, big: Chips },

    #[error("диапазон бай-ина задан неверно: min={min}, max={max}")]
    InvalidBuyInRange { min: Chips, max: Chips },

    #[error("базовое время на ход должно быть больше нуля")]
    InvalidTimeRules,

    #[error("не удалось разобрать конфиг: {0}")]
    Parse(String),
}

/// Стейки стола (SB/BB).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
}

impl TableStakes {
    pub fn new(sb: Chips, bb: Chips) -> Self {
        Self {
            small_blind: sb,
            big_blind: bb,
        }
    }
}

impl Default for TableStakes {
    fn default() -> Self {
        Self::new(Chips(10), Chips(20))
    }
}

/// Конфиг стола: сколько мест, какие блайнды, бай-ин и тайминг.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    /// Максимальное количество мест за столом (2–10, по умолчанию 6).
    pub max_seats: u8,
    pub stakes: TableStakes,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    /// Правила таймера хода.
    pub time: TimeRules,
    /// Начинать следующую раздачу сразу после выплаты.
    pub auto_start: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        let stakes = TableStakes::default();
        Self {
            max_seats: 6,
            stakes,
            min_buy_in: Chips(stakes.big_blind.0 * 20),
            max_buy_in: Chips(stakes.big_blind.0 * 500),
            time: TimeRules::standard(),
            auto_start: true,
        }
    }
}

impl TableConfig {
    /// Разобрать конфиг из JSON; незаданные поля берутся по умолчанию.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: TableConfig =
            serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_SEATS_LIMIT).contains(&self.max_seats) {
            return Err(ConfigError::InvalidSeatCount(self.max_seats));
        }
        let TableStakes {
            small_blind,
            big_blind,
        } = self.stakes;
        if small_blind.is_zero() || big_blind < small_blind {
            return Err(ConfigError::InvalidBlinds {
                small: small_blind,
                big: big_blind,
            });
        }
        if self.min_buy_in.is_zero() || self.min_buy_in > self.max_buy_in {
            return Err(ConfigError::InvalidBuyInRange {
                min: self.min_buy_in,
                max: self.max_buy_in,
            });
        }
        if self.time.base_action_secs == 0 {
            return Err(ConfigError::InvalidTimeRules);
        }
        Ok(())
    }

    pub fn buy_in_limits(&self) -> BuyInLimits {
        BuyInLimits {
            min: self.min_buy_in,
            max: self.max_buy_in,
        }
    }
}

/// Основное состояние стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub config: TableConfig,

    /// Места за столом.
    pub seats: SeatLedger,

    /// Общие карты борда (0–5 карт).
    pub board: Vec<Card>,

    /// Индекс дилерской кнопки или None, если раздач ещё не было.
    pub dealer_button: Option<SeatIndex>,

    /// ID текущей (или последней) раздачи.
    pub hand_id: Option<HandId>,

    pub phase: Phase,
}

impl Table {
    /// Создать пустой стол с заданной конфигурацией.
    pub fn new(id: TableId, config: TableConfig) -> Self {
        let seats = SeatLedger::new(config.max_seats);
        Self {
            id,
            config,
            seats,
            board: Vec::new(),
            dealer_button: None,
            hand_id: None,
            phase: Phase::Waiting,
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seats
            .seat(index)
            .map(|s| !s.is_occupied())
            .unwrap_or(true)
    }
}
