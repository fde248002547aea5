//! Позиции за столом: обход по часовой, кнопка, блайнды, первый ход.

use crate::domain::ledger::SeatLedger;
use crate::domain::seat::Seat;
use crate::domain::SeatIndex;
use crate::engine::errors::EngineError;

/// Индексы мест по часовой начиная со `start` (включая/исключая его самого).
/// Каждое место встречается ровно один раз.
pub fn clockwise_from(len: usize, start: SeatIndex, include_start: bool) -> Vec<SeatIndex> {
    if len == 0 {
        return Vec::new();
    }
    let first = if include_start { 0 } else { 1 };
    (first..first + len)
        .map(|offset| ((start as usize + offset) % len) as SeatIndex)
        .collect()
}

/// Первое место после `from` (по часовой, `from` проверяется последним),
/// удовлетворяющее условию.
pub fn next_seat_matching<F>(ledger: &SeatLedger, from: SeatIndex, pred: F) -> Option<SeatIndex>
where
    F: Fn(&Seat) -> bool,
{
    clockwise_from(ledger.len(), from, false)
        .into_iter()
        .find(|idx| ledger.seat(*idx).map(&pred).unwrap_or(false))
}

/// Следующее место, которое может действовать.
pub fn next_active_seat(ledger: &SeatLedger, from: SeatIndex) -> Result<SeatIndex, EngineError> {
    next_seat_matching(ledger, from, Seat::is_active).ok_or(EngineError::NoEligibleActor)
}

/// Кнопка для новой раздачи. Вызывается после `begin_hand`, когда участники
/// уже `Active`: если кнопка стоит на участнике — остаётся, иначе едет
/// к следующему участнику; на первой раздаче — первый участник от места 0.
pub fn choose_button(ledger: &SeatLedger, current: Option<SeatIndex>) -> Option<SeatIndex> {
    match current {
        Some(button) if ledger.seat(button).map(Seat::is_active).unwrap_or(false) => Some(button),
        Some(button) => next_seat_matching(ledger, button, Seat::is_active),
        None => clockwise_from(ledger.len(), 0, true)
            .into_iter()
            .find(|idx| ledger.seat(*idx).map(Seat::is_active).unwrap_or(false)),
    }
}

/// Места малого и большого блайнда.
///
/// Хедз-ап: дилер ставит малый блайнд, второй игрок — большой.
/// Иначе SB — следующий участник после кнопки, BB — следующий после SB.
pub fn blind_seats(
    ledger: &SeatLedger,
    button: SeatIndex,
    participants: usize,
) -> Result<(SeatIndex, SeatIndex), EngineError> {
    let sb = if participants == 2 {
        button
    } else {
        next_active_seat(ledger, button)?
    };
    let bb = next_active_seat(ledger, sb)?;
    Ok((sb, bb))
}

/// Порядок выплат: от места после кнопки по часовой, кнопка последняя.
pub fn payout_order(len: usize, button: SeatIndex) -> Vec<SeatIndex> {
    clockwise_from(len, button, false)
}
