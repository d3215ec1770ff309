//! Absorption rules
//!
//! Two independent passes run once per tick:
//! - creature–cell: a creature touching a cell takes its score, the cell is removed
//! - creature–creature: over every unordered pair, a creature absorbs another
//!   only when it leads by more than the margin; near-equal pairs bounce off

use crate::game::spatial::Grid;
use crate::game::state::{Cell, CellId, CreatureBody, CreatureId};
use crate::game::systems::lifecycle;
use crate::util::vec2::Vec2;

/// A cell taken by a creature
#[derive(Debug, Clone, PartialEq)]
pub struct CellAbsorption {
    pub creature_id: CreatureId,
    pub cell_id: CellId,
    pub score: f32,
}

/// A creature taken by another
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureAbsorption {
    pub predator_id: CreatureId,
    pub prey_id: CreatureId,
    pub score: f32,
}

/// Outcome of a creature pair in contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    /// Scores within the margin: nothing happens this tick
    Bounce,
    /// The first creature absorbs the second
    FirstAbsorbs,
    /// The second creature absorbs the first
    SecondAbsorbs,
}

/// Strict overlap test between a creature and a cell (squared distance, no sqrt)
#[inline]
pub fn touches_cell(position: Vec2, radius: f32, cell: &Cell) -> bool {
    let reach = radius + cell.radius;
    position.distance_sq_to(cell.position) < reach * reach
}

/// Contact test between two creatures; touching edges count
#[inline]
pub fn in_contact(a: &CreatureBody, b: &CreatureBody) -> bool {
    let reach = a.radius() + b.radius();
    a.position.distance_sq_to(b.position) <= reach * reach
}

/// Decide a pair from scores alone
///
/// Two one-directional comparisons, so the band `|a - b| <= margin` is a real
/// no-op band rather than a tie broken by max/min.
#[inline]
pub fn resolve_pair(first_score: f32, second_score: f32, margin: f32) -> PairOutcome {
    if first_score > second_score + margin {
        PairOutcome::FirstAbsorbs
    } else if second_score > first_score + margin {
        PairOutcome::SecondAbsorbs
    } else {
        PairOutcome::Bounce
    }
}

/// Let one creature absorb every cell it touches
///
/// Walks the list from last to first so removals never shift an index that is
/// still to be visited. Dead creatures absorb nothing.
pub fn absorb_cells(
    body: &mut CreatureBody,
    cells: &mut Vec<Cell>,
    grid: &mut Grid,
) -> Vec<CellAbsorption> {
    let mut absorbed = Vec::new();
    if !body.alive {
        return absorbed;
    }

    for i in (0..cells.len()).rev() {
        if touches_cell(body.position, body.radius(), &cells[i]) {
            let cell = lifecycle::remove_at(cells, grid, i);
            body.score += cell.score;
            tracing::debug!(
                "{} absorbed cell {} (+{}) -> {}",
                body.name,
                cell.id,
                cell.score,
                body.score
            );
            absorbed.push(CellAbsorption {
                creature_id: body.id,
                cell_id: cell.id,
                score: cell.score,
            });
        }
    }

    absorbed
}

/// Resolve creature–creature absorption over every pair `(i, j)`, `i < j`, once
///
/// Absorbed creatures are only marked dead; the caller prunes them after the
/// pass so no pair is skipped.
pub fn absorb_creatures(bodies: &mut [&mut CreatureBody], margin: f32) -> Vec<CreatureAbsorption> {
    let mut absorbed = Vec::new();

    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let first = &mut *head[i];

        for second in tail.iter_mut() {
            let second = &mut **second;
            if !first.alive || !second.alive || !in_contact(first, second) {
                continue;
            }

            match resolve_pair(first.score, second.score, margin) {
                PairOutcome::FirstAbsorbs => absorbed.push(absorb(first, second)),
                PairOutcome::SecondAbsorbs => absorbed.push(absorb(second, first)),
                PairOutcome::Bounce => {}
            }
        }
    }

    absorbed
}

fn absorb(predator: &mut CreatureBody, prey: &mut CreatureBody) -> CreatureAbsorption {
    predator.score += prey.score;
    prey.alive = false;
    tracing::debug!(
        "{} absorbed {} (+{}) -> {}",
        predator.name,
        prey.name,
        prey.score,
        predator.score
    );
    CreatureAbsorption {
        predator_id: predator.id,
        prey_id: prey.id,
        score: prey.score,
    }
}
