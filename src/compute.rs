//! Frame scheduler and input-driven state transitions.
//!
//! Every public function takes an immutable reference to the current
//! `GameSession` (and, where needed, an RNG handle) and returns a brand-new
//! `GameSession`.  `events` on the returned session holds only what that call
//! produced.

use rand::Rng;
use tracing::info;

use crate::behavior;
use crate::collision::{self, enemy_shots_hitting, killed_kinds, prune, resolve_player_shots};
use crate::entities::{Field, FrameEvent, FrameInput, GameSession, Phase, Player, RunState};
use crate::kinematics;
use crate::stage::{self, spawn_roster, stage_info};
use crate::tuning::Tuning;

// ── Constructors ─────────────────────────────────────────────────────────────

/// A session sitting on the title screen.
pub fn new_session(field: Field, tuning: Tuning) -> GameSession {
    GameSession {
        run: RunState::new(tuning.max_stage, tuning.max_hp),
        player: Player::spawn(&tuning, &field),
        enemies: Vec::new(),
        player_shots: Vec::new(),
        enemy_shots: Vec::new(),
        field,
        tuning,
        frame: 0,
        events: Vec::new(),
    }
}

fn begin(state: &GameSession) -> GameSession {
    let mut next = state.clone();
    next.events.clear();
    next
}

/// Fresh stage: player back at the spawn point, new roster, no shots.
fn enter_stage(next: &mut GameSession, rng: &mut impl Rng) {
    next.player = Player::spawn(&next.tuning, &next.field);
    next.enemies = spawn_roster(next.run.stage, &next.field, &next.tuning, rng);
    next.player_shots.clear();
    next.enemy_shots.clear();

    let name = stage_info(next.run.stage).name;
    next.events.push(FrameEvent::StageStarted {
        stage: next.run.stage,
        name,
    });
    info!(stage = next.run.stage, name, enemies = next.enemies.len(), "stage started");
}

// ── Run transitions ──────────────────────────────────────────────────────────

/// Start (or restart) a run from stage 1.
pub fn start_game(state: &GameSession, rng: &mut impl Rng) -> GameSession {
    let mut next = begin(state);
    stage::reset_run(&mut next.run);
    next.run.phase = Phase::Running;
    next.frame = 0;
    enter_stage(&mut next, rng);
    next
}

/// Leave `StageClear` for the following stage.  No-op in any other phase.
pub fn next_stage(state: &GameSession, rng: &mut impl Rng) -> GameSession {
    let mut next = begin(state);
    if next.run.phase != Phase::StageClear {
        return next;
    }
    stage::advance_stage(&mut next.run);
    enter_stage(&mut next, rng);
    next
}

pub fn return_to_title(state: &GameSession) -> GameSession {
    new_session(state.field, state.tuning.clone())
}

pub fn toggle_pause(state: &GameSession) -> GameSession {
    let mut next = begin(state);
    next.run.phase = match next.run.phase {
        Phase::Running => Phase::Paused,
        Phase::Paused => Phase::Running,
        other => other,
    };
    next
}

// ── Input-driven transitions ─────────────────────────────────────────────────
//
// The host calls these as keys arrive between frames; `tick` applies the same
// actions from a sampled `FrameInput`.

fn running(state: &GameSession) -> bool {
    state.run.phase == Phase::Running
}

fn fire_equipped(next: &mut GameSession) {
    let shot = behavior::fire(&next.player, next.run.equipped());
    next.player_shots.push(shot);
}

fn equip_next(next: &mut GameSession) {
    if let Some(weapon) = stage::cycle_weapon(&mut next.run) {
        next.events.push(FrameEvent::WeaponChanged { weapon });
    }
}

fn steer(state: &GameSession, input: FrameInput) -> GameSession {
    let mut next = begin(state);
    if running(state) {
        behavior::steer_player(&mut next.player, &input, &next.tuning);
    }
    next
}

pub fn move_player_left(state: &GameSession) -> GameSession {
    steer(
        state,
        FrameInput {
            left: true,
            ..FrameInput::default()
        },
    )
}

pub fn move_player_right(state: &GameSession) -> GameSession {
    steer(
        state,
        FrameInput {
            right: true,
            ..FrameInput::default()
        },
    )
}

pub fn player_jump(state: &GameSession) -> GameSession {
    let mut next = begin(state);
    if running(state) {
        behavior::jump(&mut next.player, &next.tuning);
    }
    next
}

/// One shot per call, no cooldown.
pub fn player_shoot(state: &GameSession) -> GameSession {
    let mut next = begin(state);
    if running(state) {
        fire_equipped(&mut next);
    }
    next
}

pub fn cycle_weapon(state: &GameSession) -> GameSession {
    let mut next = begin(state);
    if running(state) {
        equip_next(&mut next);
    }
    next
}

/// Route `amount` through the damage entry point.
pub fn damage_player(state: &GameSession, amount: u32) -> GameSession {
    let mut next = begin(state);
    let frames = next.tuning.invulnerability_frames;
    collision::damage_player(&mut next.run, &mut next.player, amount, frames, &mut next.events);
    next
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  Outside `Running` (paused, between
/// stages, after the run ends) the session is returned unchanged.
pub fn tick(state: &GameSession, input: &FrameInput) -> GameSession {
    let mut next = begin(state);
    if !running(state) {
        return next;
    }
    next.frame += 1;
    let field = next.field;
    let tuning = next.tuning.clone();

    // ── 1. One-shot inputs, then held movement ──────────────────────────────
    if input.jump {
        behavior::jump(&mut next.player, &tuning);
    }
    if input.shoot {
        fire_equipped(&mut next);
    }
    if input.cycle_weapon {
        equip_next(&mut next);
    }
    behavior::steer_player(&mut next.player, input, &tuning);

    // ── 2. Player motion ────────────────────────────────────────────────────
    kinematics::step_player(&mut next.player, &field, &tuning);

    // ── 3. Enemies: motion, behaviour, contact damage ───────────────────────
    let target = next.player.body.aabb();
    for enemy in next.enemies.iter_mut() {
        if let Some(shot) = behavior::step_enemy(enemy, &target, &field, &tuning) {
            next.enemy_shots.push(shot);
        }
        if collision::overlaps(&enemy.body.aabb(), &target) {
            collision::damage_player(
                &mut next.run,
                &mut next.player,
                enemy.damage,
                tuning.invulnerability_frames,
                &mut next.events,
            );
        }
        kinematics::step_enemy_animation(enemy, &tuning);
    }

    // ── 4. Move projectiles ─────────────────────────────────────────────────
    for shot in next.player_shots.iter_mut() {
        kinematics::step_player_shot(shot, &tuning);
    }
    for shot in next.enemy_shots.iter_mut() {
        kinematics::step_enemy_shot(shot);
    }

    // ── 5. Collision: player shots ↔ enemies ────────────────────────────────
    let hits = resolve_player_shots(&next.player_shots, &mut next.enemies);
    for kind in killed_kinds(&next.enemies, &hits.killed) {
        next.events.push(FrameEvent::EnemyDefeated { kind });
    }
    next.player_shots = prune(std::mem::take(&mut next.player_shots), &hits.spent);

    // ── 6. Collision: enemy shots ↔ player ──────────────────────────────────
    let struck = enemy_shots_hitting(&next.enemy_shots, &next.player);
    for &i in &struck {
        let damage = next.enemy_shots[i].damage();
        collision::damage_player(
            &mut next.run,
            &mut next.player,
            damage,
            tuning.invulnerability_frames,
            &mut next.events,
        );
    }
    next.enemy_shots = prune(std::mem::take(&mut next.enemy_shots), &struck);

    // ── 7. Prune off-field shots and dead enemies ───────────────────────────
    let margin = tuning.offscreen_margin;
    next.player_shots
        .retain(|s| !collision::is_off_field(&s.aabb(), &field, margin));
    next.enemy_shots
        .retain(|s| !collision::is_off_field(&s.aabb(), &field, margin));
    next.enemies.retain(|e| !e.is_dead());

    // ── 8. Stage progression ────────────────────────────────────────────────
    if running(&next) && next.enemies.is_empty() {
        stage::clear_stage(&mut next.run, &mut next.events);
    }

    next
}
