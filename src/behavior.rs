//! Per-variant update rules for the player and each enemy archetype.

use tracing::debug;

use crate::entities::{
    Aabb, Enemy, EnemyKind, EnemyProjectile, Facing, Field, FrameInput, Player, PlayerProjectile,
    WeaponKind,
};
use crate::kinematics::{clamp_horizontal, fall};
use crate::tuning::{Tuning, ENEMY_SHOT};

// ── Player ────────────────────────────────────────────────────────────────────

/// Held left/right overwrite the horizontal velocity; right wins when both
/// are held.
pub fn steer_player(player: &mut Player, input: &FrameInput, tuning: &Tuning) {
    if input.left {
        player.body.vx = -tuning.player_speed;
        player.facing = Facing::Left;
    }
    if input.right {
        player.body.vx = tuning.player_speed;
        player.facing = Facing::Right;
    }
}

/// Launch upward if grounded.  Returns whether the jump happened.
pub fn jump(player: &mut Player, tuning: &Tuning) -> bool {
    if !player.on_ground {
        return false;
    }
    player.body.vy = -tuning.jump_power;
    player.on_ground = false;
    true
}

/// Spawn a shot at the facing edge of the player, vertically centred.
pub fn fire(player: &Player, weapon: WeaponKind) -> PlayerProjectile {
    let body = &player.body;
    let x = match player.facing {
        Facing::Right => body.x + body.width,
        Facing::Left => body.x,
    };
    PlayerProjectile::new(x, body.y + body.height / 2.0, player.facing, weapon)
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Velocity of `speed` pointing from `from` to `to`, or `None` when the two
/// points coincide and no heading exists.
pub fn aim(from: (f32, f32), to: (f32, f32), speed: f32) -> Option<(f32, f32)> {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 || !distance.is_finite() {
        return None;
    }
    Some((dx / distance * speed, dy / distance * speed))
}

/// Walk at fixed speed and turn around at either wall.
fn patrol(enemy: &mut Enemy, field: &Field) {
    let body = &mut enemy.body;
    body.x += enemy.speed * enemy.direction.sign();
    if body.x <= 0.0 || body.x >= field.max_x_for(body.width) {
        enemy.direction = enemy.direction.reversed();
    }
}

fn chase(enemy: &mut Enemy, target: &Aabb, field: &Field) {
    enemy.direction = if target.x < enemy.body.x {
        Facing::Left
    } else {
        Facing::Right
    };
    enemy.body.x += enemy.speed * enemy.direction.sign();
    clamp_horizontal(&mut enemy.body, field);
}

fn hop_on_timer(enemy: &mut Enemy, tuning: &Tuning) {
    enemy.jump_timer += 1;
    if enemy.jump_timer > tuning.jump_interval {
        enemy.body.vy = -tuning.enemy_jump_power;
        enemy.jump_timer = 0;
    }
}

/// Fire at the target's centre when the shoot timer runs out.  A target
/// sitting exactly on the enemy's centre skips the shot; the timer still resets.
fn shoot_on_timer(enemy: &mut Enemy, target: &Aabb, tuning: &Tuning) -> Option<EnemyProjectile> {
    enemy.shoot_timer += 1;
    if enemy.shoot_timer <= tuning.shoot_interval {
        return None;
    }
    enemy.shoot_timer = 0;

    let origin = enemy.body.aabb().center();
    match aim(origin, target.center(), tuning.enemy_shot_speed) {
        Some((vx, vy)) => Some(EnemyProjectile::new(
            origin.0 - ENEMY_SHOT.width / 2.0,
            origin.1 - ENEMY_SHOT.height / 2.0,
            vx,
            vy,
        )),
        None => {
            debug!(kind = ?enemy.kind, "target on enemy centre, shot skipped");
            None
        }
    }
}

/// One frame of enemy motion and behaviour.  Gravity applies to every variant;
/// horizontal movement and timers depend on the kind.  May return a new shot.
pub fn step_enemy(
    enemy: &mut Enemy,
    target: &Aabb,
    field: &Field,
    tuning: &Tuning,
) -> Option<EnemyProjectile> {
    fall(&mut enemy.body, field, tuning);

    let shot = match enemy.kind {
        EnemyKind::Basic => {
            patrol(enemy, field);
            None
        }
        EnemyKind::Jumper => {
            hop_on_timer(enemy, tuning);
            patrol(enemy, field);
            None
        }
        EnemyKind::Shooter => shoot_on_timer(enemy, target, tuning),
        EnemyKind::Runner => {
            chase(enemy, target, field);
            None
        }
        EnemyKind::Boss => {
            patrol(enemy, field);
            shoot_on_timer(enemy, target, tuning)
        }
    };

    clamp_horizontal(&mut enemy.body, field);
    shot
}
