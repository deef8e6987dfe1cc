use crate::model::player::Seat;

/// Picks the seat that acts next in the auction, or `None` once the auction
/// is over.
///
/// `eligible` lists the seats that have not passed, in turn order starting
/// left of the dealer. `last_bidder` is the seat that most recently bid or
/// stayed. After any bid the turn alternates between the front of the ring
/// and the seat behind it, so the auction collapses as players pass.
///
/// # Panics
///
/// Panics if `last_bidder` is set but no longer eligible. The auction never
/// removes its last bidder, so this only fires on a logic defect.
pub fn next_bidder(eligible: &[Seat], last_bidder: Option<Seat>) -> Option<Seat> {
    let first = *eligible.first()?;
    let Some(last) = last_bidder else {
        return Some(first);
    };

    let position = eligible
        .iter()
        .position(|&seat| seat == last)
        .expect("last bidder remains eligible");

    if position > 0 {
        Some(first)
    } else {
        eligible.get(1).copied()
    }
}
