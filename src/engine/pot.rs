//! Учёт банка: вклады мест за раздачу, нарезка основного и сайд-потов, выплаты.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::SeatIndex;
use crate::engine::errors::EngineError;
use crate::eval::HandValue;

/// Номер банка в раздаче: 0 – основной, дальше сайд-поты по возрастанию уровня.
pub type PotId = u8;

/// Один банк: сумма и места, которые могут его выиграть.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub id: PotId,
    pub amount: Chips,
    /// Внесли до этого уровня и ещё в игре, по возрастанию индекса.
    pub eligible_seats: Vec<SeatIndex>,
}

/// Выплата одного банка.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotAward {
    pub pot_id: PotId,
    pub amount: Chips,
    /// Победители в порядке хода по часовой от дилера.
    pub winners: Vec<SeatIndex>,
    /// Сколько получил каждый победитель.
    pub shares: Vec<(SeatIndex, Chips)>,
    /// Рука-победитель; `None`, если банк забран без вскрытия.
    pub winning_hand: Option<HandValue>,
}

/// Вклады мест за одну раздачу.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotAccountant {
    contributions: BTreeMap<SeatIndex, Chips>,
    total: Chips,
}

impl PotAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, seat: SeatIndex, amount: Chips) {
        if amount.is_zero() {
            return;
        }
        *self.contributions.entry(seat).or_insert(Chips::ZERO) += amount;
        self.total += amount;
    }

    pub fn total(&self) -> Chips {
        self.total
    }

    pub fn reset(&mut self) {
        self.contributions.clear();
        self.total = Chips::ZERO;
    }

    /// Нарезать банки по уровням вкладов.
    ///
    /// Уровни — различные суммы вкладов по возрастанию. Банк уровня:
    /// `(level - prev_level) * число мест с вкладом >= level`; претенденты —
    /// те из них, кто есть в `contenders`. Соседние банки с одинаковым составом
    /// претендентов сливаются. Уровень, где все внёсшие сфолдили (встали
    /// из-за стола посреди раздачи), — мёртвые деньги предыдущего банка.
    ///
    /// Если сфолдили вообще все внёсшие (оба блайнда встали до первого хода),
    /// весь банк — один банк на всех `contenders`. Без претендентов это
    /// нарушение инварианта.
    pub fn compute_pots(&self, contenders: &BTreeSet<SeatIndex>) -> Result<Vec<Pot>, EngineError> {
        let levels: BTreeSet<Chips> = self
            .contributions
            .values()
            .copied()
            .filter(|c| !c.is_zero())
            .collect();

        let mut pots: Vec<Pot> = Vec::new();
        let mut prev_level = Chips::ZERO;
        let mut dead = Chips::ZERO;

        for level in levels {
            let contributors: Vec<SeatIndex> = self
                .contributions
                .iter()
                .filter(|(_, c)| **c >= level)
                .map(|(seat, _)| *seat)
                .collect();
            let amount = Chips((level.0 - prev_level.0) * contributors.len() as u64);
            let eligible: Vec<SeatIndex> = contributors
                .into_iter()
                .filter(|seat| contenders.contains(seat))
                .collect();
            prev_level = level;

            match pots.last_mut() {
                Some(last) if last.eligible_seats == eligible || eligible.is_empty() => {
                    last.amount += amount
                }
                None if eligible.is_empty() => dead += amount,
                _ => pots.push(Pot {
                    id: pots.len() as PotId,
                    amount,
                    eligible_seats: eligible,
                }),
            }
        }

        if !dead.is_zero() {
            if contenders.is_empty() {
                return Err(EngineError::NoEligiblePlayers(0));
            }
            pots.push(Pot {
                id: 0,
                amount: dead,
                eligible_seats: contenders.iter().copied().collect(),
            });
        }

        Ok(pots)
    }
}

/// Разыграть банки.
///
/// `values` — силы рук вскрывшихся мест; `order` — все места по часовой,
/// начиная со следующего за дилером (дилер последний). Банк делится поровну
/// между лучшими руками, остаток от деления целиком уходит первому из
/// победителей в этом порядке.
pub fn distribute(
    pots: &[Pot],
    values: &BTreeMap<SeatIndex, HandValue>,
    order: &[SeatIndex],
) -> Result<Vec<PotAward>, EngineError> {
    let position = |seat: &SeatIndex| order.iter().position(|s| s == seat).unwrap_or(usize::MAX);

    let mut awards = Vec::with_capacity(pots.len());
    for pot in pots {
        let (mut winners, winning_hand) = match pot.eligible_seats.as_slice() {
            [] => return Err(EngineError::NoEligiblePlayers(pot.id)),
            [only] => (vec![*only], values.get(only).copied()),
            eligible => {
                let mut best: Option<HandValue> = None;
                let mut winners = Vec::new();
                for seat in eligible {
                    let value = values
                        .get(seat)
                        .copied()
                        .ok_or(EngineError::Internal("нет оценки руки у претендента на банк"))?;
                    match best {
                        Some(b) if value < b => {}
                        Some(b) if value == b => winners.push(*seat),
                        _ => {
                            best = Some(value);
                            winners = vec![*seat];
                        }
                    }
                }
                (winners, best)
            }
        };
        winners.sort_by_key(position);

        let n = winners.len() as u64;
        let share = Chips(pot.amount.0 / n);
        let remainder = Chips(pot.amount.0 % n);
        let shares = winners
            .iter()
            .enumerate()
            .map(|(i, seat)| (*seat, if i == 0 { share + remainder } else { share }))
            .collect();

        awards.push(PotAward {
            pot_id: pot.id,
            amount: pot.amount,
            winners,
            shares,
            winning_hand,
        });
    }
    Ok(awards)
}
