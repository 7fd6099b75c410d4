//! Index arithmetic for next/previous. Pure functions over the playlist
//! length and cursor; the caller decides whether to select the result.

use rand::Rng;

use super::model::RepeatMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Policy {
    pub shuffle: bool,
    pub repeat: RepeatMode,
    /// Manual skips ignore `RepeatMode::One` and always wrap.
    pub manual: bool,
}

pub(crate) fn step<R: Rng + ?Sized>(
    len: usize,
    current: Option<usize>,
    direction: Direction,
    policy: Policy,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current.filter(|&i| i < len)?;

    if policy.repeat == RepeatMode::One && !policy.manual {
        return Some(current);
    }
    if policy.shuffle {
        return Some(random_other(len, current, rng));
    }

    let wrap = policy.manual || policy.repeat == RepeatMode::All;
    match direction {
        Direction::Forward if current + 1 < len => Some(current + 1),
        Direction::Forward => wrap.then_some(0),
        Direction::Backward if current > 0 => Some(current - 1),
        Direction::Backward => wrap.then_some(len - 1),
    }
}

/// Uniform pick over `0..len`, excluding `current` when there is a choice.
pub(crate) fn random_other<R: Rng + ?Sized>(len: usize, current: usize, rng: &mut R) -> usize {
    if len <= 1 {
        return 0;
    }
    let pick = rng.gen_range(0..len - 1);
    if pick >= current { pick + 1 } else { pick }
}
