use crate::game::constants::ai::AGGRESSION_RADIUS;
use crate::game::constants::creature::BASE_SCORE;
use crate::game::creature::Perception;
use crate::game::state::{CreatureBody, CreatureSnapshot};
use crate::util::vec2::Vec2;

/// AI behavior mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiBehavior {
    /// Drift along the heading
    Wander,
    /// Head for the nearest visible cell
    Collect,
    /// Chase a creature this one can absorb
    Chase,
    /// Run from a creature that can absorb this one
    Flee,
}

/// AI state for an enemy
#[derive(Debug, Clone)]
pub struct AiState {
    pub behavior: AiBehavior,
    /// Unit wander direction, reflected off the world edges
    pub heading: Vec2,
}

impl AiState {
    pub fn new(heading: Vec2) -> Self {
        Self {
            behavior: AiBehavior::Wander,
            heading: heading.normalize(),
        }
    }
}

/// Pick this tick's behavior and return a unit steering direction
pub fn decide(ai: &mut AiState, me: &CreatureBody, perception: &Perception) -> Vec2 {
    let (threat, prey) = find_nearest_creatures(me, &perception.creatures);

    if let Some(threat) = threat {
        ai.behavior = AiBehavior::Flee;
        let away = (me.position - threat.position).normalize();
        // Sitting exactly on the threat: any direction will do
        return if away == Vec2::ZERO { ai.heading } else { away };
    }

    if let Some(prey) = prey {
        ai.behavior = AiBehavior::Chase;
        return (prey.position - me.position).normalize();
    }

    if let Some(cell) = perception.window.nearest_to(me.position) {
        ai.behavior = AiBehavior::Collect;
        return (cell - me.position).normalize();
    }

    ai.behavior = AiBehavior::Wander;
    ai.heading
}

/// Find the nearest threat (could absorb `me`) and nearest prey (`me` could absorb)
///
/// Threats count within `AGGRESSION_RADIUS`, prey within twice that. Dead
/// creatures are ignored.
fn find_nearest_creatures(
    me: &CreatureBody,
    creatures: &[CreatureSnapshot],
) -> (Option<CreatureSnapshot>, Option<CreatureSnapshot>) {
    let mut nearest_threat: Option<(CreatureSnapshot, f32)> = None;
    let mut nearest_prey: Option<(CreatureSnapshot, f32)> = None;

    for other in creatures {
        if other.id == me.id || !other.alive {
            continue;
        }

        let dist = me.position.distance_to(other.position);

        if other.score > me.score + BASE_SCORE {
            if dist < AGGRESSION_RADIUS && nearest_threat.map_or(true, |(_, d)| dist < d) {
                nearest_threat = Some((*other, dist));
            }
        } else if me.score > other.score + BASE_SCORE
            && dist < AGGRESSION_RADIUS * 2.0
            && nearest_prey.map_or(true, |(_, d)| dist < d)
        {
            nearest_prey = Some((*other, dist));
        }
    }

    (nearest_threat.map(|(s, _)| s), nearest_prey.map(|(s, _)| s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::spatial::{Grid, VisibilityWindow};
    use crate::game::state::Cell;
    use crate::util::color::Color;
    use std::rc::Rc;

    fn create_body(position: Vec2, score: f32) -> CreatureBody {
        CreatureBody::new(position, "bot".to_string(), Color::WHITE).with_score(score)
    }

    fn perception(creatures: Vec<CreatureSnapshot>, window: VisibilityWindow) -> Perception {
        Perception {
            window,
            creatures: Rc::from(creatures),
        }
    }

    #[test]
    fn test_flee_from_bigger() {
        let mut ai = AiState::new(Vec2::new(0.0, 1.0));
        let me = create_body(Vec2::new(100.0, 100.0), 10.0);
        let threat = create_body(Vec2::new(150.0, 100.0), 40.0);
        let p = perception(vec![me.snapshot(), threat.snapshot()], VisibilityWindow::default());

        let dir = decide(&mut ai, &me, &p);

        assert_eq!(ai.behavior, AiBehavior::Flee);
        assert!(dir.approx_eq(Vec2::new(-1.0, 0.0), 1e-5));
    }

    #[test]
    fn test_chase_smaller() {
        let mut ai = AiState::new(Vec2::new(0.0, 1.0));
        let me = create_body(Vec2::new(100.0, 100.0), 40.0);
        let prey = create_body(Vec2::new(100.0, 300.0), 10.0);
        let p = perception(vec![prey.snapshot(), me.snapshot()], VisibilityWindow::default());

        let dir = decide(&mut ai, &me, &p);

        assert_eq!(ai.behavior, AiBehavior::Chase);
        assert!(dir.approx_eq(Vec2::new(0.0, 1.0), 1e-5));
    }

    #[test]
    fn test_near_equal_creatures_ignored() {
        let mut ai = AiState::new(Vec2::new(1.0, 0.0));
        let me = create_body(Vec2::new(100.0, 100.0), 10.0);
        let other = create_body(Vec2::new(110.0, 100.0), 14.0);
        let p = perception(vec![other.snapshot()], VisibilityWindow::default());

        let dir = decide(&mut ai, &me, &p);

        assert_eq!(ai.behavior, AiBehavior::Wander);
        assert_eq!(dir, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_far_threat_ignored() {
        let mut ai = AiState::new(Vec2::new(1.0, 0.0));
        let me = create_body(Vec2::new(0.0, 0.0), 10.0);
        let threat = create_body(Vec2::new(AGGRESSION_RADIUS + 1.0, 0.0), 100.0);
        let p = perception(vec![threat.snapshot()], VisibilityWindow::default());

        decide(&mut ai, &me, &p);

        assert_ne!(ai.behavior, AiBehavior::Flee);
    }

    #[test]
    fn test_flee_beats_chase() {
        let mut ai = AiState::new(Vec2::new(1.0, 0.0));
        let me = create_body(Vec2::new(100.0, 100.0), 20.0);
        let prey = create_body(Vec2::new(110.0, 100.0), 5.0);
        let threat = create_body(Vec2::new(100.0, 200.0), 60.0);
        let p = perception(
            vec![prey.snapshot(), threat.snapshot()],
            VisibilityWindow::default(),
        );

        decide(&mut ai, &me, &p);

        assert_eq!(ai.behavior, AiBehavior::Flee);
    }

    #[test]
    fn test_collect_nearest_visible_cell() {
        let mut grid = Grid::new(Vec2::new(100.0, 100.0), 10, 10);
        grid.insert(&Cell::new(1, Vec2::new(45.0, 5.0))).unwrap();
        grid.insert(&Cell::new(2, Vec2::new(95.0, 95.0))).unwrap();

        let mut ai = AiState::new(Vec2::new(0.0, 1.0));
        let me = create_body(Vec2::new(5.0, 5.0), 5.0);
        let p = perception(vec![me.snapshot()], grid.windowed_query((0, 0), 10));

        let dir = decide(&mut ai, &me, &p);

        assert_eq!(ai.behavior, AiBehavior::Collect);
        assert!(dir.approx_eq(Vec2::new(1.0, 0.0), 1e-5));
    }

    #[test]
    fn test_cells_outside_window_unseen() {
        let mut grid = Grid::new(Vec2::new(100.0, 100.0), 10, 10);
        grid.insert(&Cell::new(1, Vec2::new(95.0, 95.0))).unwrap();

        let mut ai = AiState::new(Vec2::new(0.0, 1.0));
        let me = create_body(Vec2::new(5.0, 5.0), 5.0);
        let p = perception(Vec::new(), grid.windowed_query((0, 0), 2));

        decide(&mut ai, &me, &p);

        assert_eq!(ai.behavior, AiBehavior::Wander);
    }

    #[test]
    fn test_dead_creatures_ignored() {
        let mut ai = AiState::new(Vec2::new(1.0, 0.0));
        let me = create_body(Vec2::new(100.0, 100.0), 20.0);
        let mut threat = create_body(Vec2::new(120.0, 100.0), 80.0);
        threat.alive = false;
        let mut prey = create_body(Vec2::new(100.0, 130.0), 5.0);
        prey.alive = false;
        let p = perception(
            vec![threat.snapshot(), prey.snapshot(), me.snapshot()],
            VisibilityWindow::default(),
        );

        let dir = decide(&mut ai, &me, &p);

        assert_eq!(ai.behavior, AiBehavior::Wander);
        assert_eq!(dir, Vec2::new(1.0, 0.0));
    }
}
