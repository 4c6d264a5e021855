//! AABB collision passes and the player damage entry point.
//!
//! Passes never remove while scanning: they return the indices to drop and
//! `prune` builds the surviving roster afterwards.

use tracing::info;

use crate::entities::{
    Aabb, Enemy, EnemyKind, EnemyProjectile, Field, FrameEvent, Phase, Player, PlayerProjectile,
    RunState,
};

/// Half-open overlap test; touching edges do not collide.
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

pub fn is_off_field(aabb: &Aabb, field: &Field, margin: f32) -> bool {
    aabb.x < -margin
        || aabb.x > field.width + margin
        || aabb.y < -margin
        || aabb.y > field.height + margin
}

/// Keep the items whose index is not in `marked`.
pub fn prune<T>(items: Vec<T>, marked: &[usize]) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !marked.contains(i))
        .map(|(_, item)| item)
        .collect()
}

// ── Damage ────────────────────────────────────────────────────────────────────

/// The only way player health goes down.  Ignored while invulnerable or when
/// the run is not in progress.  Emits `PlayerDamaged`, and `GameOver` on the
/// hit that empties the health bar.  Returns whether damage landed.
pub fn damage_player(
    run: &mut RunState,
    player: &mut Player,
    amount: u32,
    invulnerability_frames: u32,
    events: &mut Vec<FrameEvent>,
) -> bool {
    if amount == 0 || run.phase != Phase::Running || player.is_invulnerable() {
        return false;
    }

    run.hp = run.hp.saturating_sub(amount);
    player.invulnerable_frames = invulnerability_frames;
    events.push(FrameEvent::PlayerDamaged {
        amount,
        hp: run.hp,
    });

    if run.hp == 0 {
        run.phase = Phase::GameOver;
        events.push(FrameEvent::GameOver { stage: run.stage });
        info!(stage = run.stage, "game over");
    }
    true
}

// ── Passes ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShotHits {
    /// Player shots that struck something this frame.
    pub spent: Vec<usize>,
    /// Enemies whose health reached zero, in the order they fell.
    pub killed: Vec<usize>,
}

/// Player shots against enemies.  Each shot is consumed by the first live
/// enemy it overlaps in roster order; enemies already killed this pass are
/// skipped so one shot never lands on a corpse.
pub fn resolve_player_shots(shots: &[PlayerProjectile], enemies: &mut [Enemy]) -> ShotHits {
    let mut hits = ShotHits::default();

    for (si, shot) in shots.iter().enumerate() {
        let shot_box = shot.aabb();
        for (ei, enemy) in enemies.iter_mut().enumerate() {
            if enemy.is_dead() || !overlaps(&shot_box, &enemy.body.aabb()) {
                continue;
            }
            enemy.hp -= shot.damage() as i32;
            hits.spent.push(si);
            if enemy.is_dead() {
                hits.killed.push(ei);
            }
            break;
        }
    }

    hits
}

/// Enemy shots against the player.  Returns the indices of every shot that
/// overlaps, whether or not the player was invulnerable at the time.
pub fn enemy_shots_hitting(shots: &[EnemyProjectile], player: &Player) -> Vec<usize> {
    let target = player.body.aabb();
    shots
        .iter()
        .enumerate()
        .filter(|(_, shot)| overlaps(&shot.aabb(), &target))
        .map(|(i, _)| i)
        .collect()
}

/// Kinds of the enemies listed in `killed`, for event reporting.
pub fn killed_kinds(enemies: &[Enemy], killed: &[usize]) -> Vec<EnemyKind> {
    killed.iter().filter_map(|&i| enemies.get(i)).map(|e| e.kind).collect()
}
