//! Per-frame position integration.
//!
//! Integration is explicit Euler and locked to the frame: one call advances one
//! display frame, whatever its real duration.  Hosts running at a different
//! refresh rate will see the game run faster or slower.

use crate::entities::{Body, Enemy, EnemyProjectile, Field, Player, PlayerProjectile, TrailPoint};
use crate::tuning::Tuning;

const PLAYER_ANIM_FRAMES: u8 = 4;
const ENEMY_ANIM_FRAMES: u8 = 2;

/// Apply gravity, integrate vertical motion and rest on the ground.
/// Returns `true` when the body is standing on the ground after the step.
pub fn fall(body: &mut Body, field: &Field, tuning: &Tuning) -> bool {
    body.vy += tuning.gravity;
    body.y += body.vy;

    let floor = field.floor_for(body.height);
    if body.y > floor {
        body.y = floor;
        body.vy = 0.0;
        return true;
    }
    if body.y < 0.0 {
        body.y = 0.0;
        body.vy = body.vy.max(0.0);
    }
    false
}

pub fn clamp_horizontal(body: &mut Body, field: &Field) {
    body.x = body.x.clamp(0.0, field.max_x_for(body.width));
}

/// Cyclic animation counter; advances `frame` once `timer` exceeds `interval`.
fn step_animation(frame: &mut u8, timer: &mut u32, interval: u32, frames: u8) {
    *timer += 1;
    if *timer > interval {
        *frame = (*frame + 1) % frames;
        *timer = 0;
    }
}

/// One frame of player motion: gravity, both axes of integration, ground and
/// wall clamps, friction, animation and the invulnerability countdown.
pub fn step_player(player: &mut Player, field: &Field, tuning: &Tuning) {
    let body = &mut player.body;
    body.x += body.vx;
    player.on_ground = fall(body, field, tuning);
    clamp_horizontal(body, field);

    body.vx *= tuning.friction;
    if body.vx.abs() < tuning.friction_epsilon {
        body.vx = 0.0;
    }

    step_animation(
        &mut player.anim_frame,
        &mut player.anim_timer,
        tuning.player_anim_interval,
        PLAYER_ANIM_FRAMES,
    );
    player.invulnerable_frames = player.invulnerable_frames.saturating_sub(1);
}

pub fn step_enemy_animation(enemy: &mut Enemy, tuning: &Tuning) {
    step_animation(
        &mut enemy.anim_frame,
        &mut enemy.anim_timer,
        tuning.enemy_anim_interval,
        ENEMY_ANIM_FRAMES,
    );
}

// ── Projectiles ───────────────────────────────────────────────────────────────

pub fn step_player_shot(shot: &mut PlayerProjectile, tuning: &Tuning) {
    shot.x += shot.speed() * shot.direction.sign();

    shot.trail.push(TrailPoint {
        x: shot.x,
        y: shot.y,
        alpha: 1.0,
    });
    for point in shot.trail.iter_mut() {
        point.alpha -= tuning.trail_fade;
    }
    shot.trail.retain(|p| p.alpha > f32::EPSILON);
}

pub fn step_enemy_shot(shot: &mut EnemyProjectile) {
    let (vx, vy) = shot.velocity();
    shot.x += vx;
    shot.y += vy;
}
