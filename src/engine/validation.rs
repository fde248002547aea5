use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::seat::Seat;
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::BettingRound;
use crate::engine::errors::EngineError;

/// Действие, доступное месту, которое сейчас ходит.
/// Суммы `min`/`max`/`to` — итоговая ставка в раунде.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LegalAction {
    Fold,
    Check,
    /// Сколько фишек добавится к ставке (может быть меньше долга, если это олл-ин).
    Call { amount: Chips },
    Bet { min: Chips, max: Chips },
    Raise { min: Chips, max: Chips },
    AllIn { to: Chips },
}

/// Намерение после проверки: что реально произойдёт с фишками.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedAction {
    Fold,
    Check,
    /// Перенести `add` из стека; итоговая ставка в раунде станет `to`.
    Commit { add: Chips, to: Chips },
}

/// Контекст ходящего места.
struct Facing {
    committed: Chips,
    stack: Chips,
    to_call: Chips,
    max_to: Chips,
    /// Можно ли повышать: торговля открыта для места и есть кому отвечать.
    may_raise: bool,
}

impl Facing {
    fn new(seat: &Seat, round: &BettingRound, opponents_can_act: bool) -> Self {
        let committed = seat.committed_round;
        Self {
            committed,
            stack: seat.stack,
            to_call: round.current_bet.saturating_sub(committed),
            max_to: committed + seat.stack,
            may_raise: opponents_can_act && round.can_raise(seat.index),
        }
    }
}

/// Список легальных действий для места `seat`.
///
/// `opponents_can_act` — есть ли кроме него хоть одно `Active` место;
/// если все соперники в олл-ине, повышать бессмысленно.
pub fn legal_actions(seat: &Seat, round: &BettingRound, opponents_can_act: bool) -> Vec<LegalAction> {
    if !seat.is_active() {
        return Vec::new();
    }
    let f = Facing::new(seat, round, opponents_can_act);
    let mut actions = vec![LegalAction::Fold];

    if f.to_call.is_zero() {
        actions.push(LegalAction::Check);
    } else {
        actions.push(LegalAction::Call {
            amount: f.to_call.min(f.stack),
        });
    }

    let raise_possible = f.may_raise && f.max_to > round.current_bet;
    if raise_possible {
        let min_to = round.current_bet + round.min_raise;
        if f.max_to >= min_to {
            if round.current_bet.is_zero() {
                actions.push(LegalAction::Bet { min: min_to, max: f.max_to });
            } else {
                actions.push(LegalAction::Raise { min: min_to, max: f.max_to });
            }
        }
    }

    if raise_possible || f.max_to <= round.current_bet {
        actions.push(LegalAction::AllIn { to: f.max_to });
    }

    actions
}

/// Проверить намерение и перевести его в движение фишек.
pub fn resolve_action(
    seat: &Seat,
    action: PlayerActionKind,
    round: &BettingRound,
    opponents_can_act: bool,
) -> Result<ResolvedAction, EngineError> {
    let f = Facing::new(seat, round, opponents_can_act);

    match action {
        PlayerActionKind::Fold => Ok(ResolvedAction::Fold),

        PlayerActionKind::Check => {
            if f.to_call.is_zero() {
                Ok(ResolvedAction::Check)
            } else {
                Err(EngineError::CannotCheck { to_call: f.to_call })
            }
        }

        PlayerActionKind::Call => {
            if f.to_call.is_zero() {
                return Err(EngineError::CannotCall);
            }
            let add = f.to_call.min(f.stack);
            Ok(ResolvedAction::Commit {
                add,
                to: f.committed + add,
            })
        }

        PlayerActionKind::Bet(to) => {
            if !round.current_bet.is_zero() {
                return Err(EngineError::CannotBet);
            }
            resolve_raise_to(&f, round, to)
        }

        PlayerActionKind::Raise(to) => {
            if round.current_bet.is_zero() {
                return Err(EngineError::NothingToRaise);
            }
            resolve_raise_to(&f, round, to)
        }

        PlayerActionKind::AllIn => {
            if f.max_to > round.current_bet {
                check_may_raise(&f, round)?;
            }
            Ok(ResolvedAction::Commit {
                add: f.stack,
                to: f.max_to,
            })
        }
    }
}

fn check_may_raise(f: &Facing, round: &BettingRound) -> Result<(), EngineError> {
    if f.may_raise {
        Ok(())
    } else if round.raise_locked.is_empty() {
        Err(EngineError::NoOpponentToRaise)
    } else {
        Err(EngineError::RaiseNotReopened)
    }
}

fn resolve_raise_to(f: &Facing, round: &BettingRound, to: Chips) -> Result<ResolvedAction, EngineError> {
    check_may_raise(f, round)?;
    if to > f.max_to {
        return Err(EngineError::AmountExceedsStack { to, max: f.max_to });
    }
    let min_to = round.current_bet + round.min_raise;
    // Меньше минимума можно только олл-ином выше текущей ставки.
    let short_all_in = to == f.max_to && to > round.current_bet;
    if to < min_to && !short_all_in {
        return Err(EngineError::BetTooSmall { to, min: min_to });
    }
    Ok(ResolvedAction::Commit {
        add: to - f.committed,
        to,
    })
}
