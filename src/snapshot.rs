//! Read-only view of a session for renderers and HUDs.

use crate::entities::{EnemyKind, Field, FrameEvent, GameSession, Phase, TrailPoint, WeaponKind};
use crate::stage::stage_info;
use crate::tuning::{Rgb, ENEMY_SHOT, PLAYER_COLOR};

/// Frames per on/off half-cycle of the invulnerability blink.
const BLINK_PERIOD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Enemy(EnemyKind),
    PlayerShot(WeaponKind),
    EnemyShot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteView {
    pub kind: SpriteKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
    /// Only bosses carry a health bar.
    pub health_fraction: Option<f32>,
    /// False during the dim half of the invulnerability blink.
    pub visible: bool,
    pub trail: Vec<TrailPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub phase: Phase,
    pub stage: u32,
    pub stage_name: &'static str,
    pub hp: u32,
    pub max_hp: u32,
    pub health_fraction: f32,
    pub weapon: &'static str,
    pub enemy_count: usize,
    pub shot_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub field: Field,
    pub hud: Hud,
    /// Draw order: player, enemies, player shots, enemy shots.
    pub sprites: Vec<SpriteView>,
    pub events: Vec<FrameEvent>,
}

fn player_visible(invulnerable_frames: u32) -> bool {
    invulnerable_frames == 0 || (invulnerable_frames / BLINK_PERIOD) % 2 == 0
}

pub fn hud(state: &GameSession) -> Hud {
    let run = &state.run;
    Hud {
        phase: run.phase,
        stage: run.stage,
        stage_name: stage_info(run.stage).name,
        hp: run.hp,
        max_hp: run.max_hp,
        health_fraction: run.health_fraction(),
        weapon: run.equipped().name(),
        enemy_count: state.enemies.len(),
        shot_count: state.player_shots.len(),
    }
}

pub fn snapshot(state: &GameSession) -> FrameSnapshot {
    let mut sprites = Vec::with_capacity(
        1 + state.enemies.len() + state.player_shots.len() + state.enemy_shots.len(),
    );

    let body = &state.player.body;
    sprites.push(SpriteView {
        kind: SpriteKind::Player,
        x: body.x,
        y: body.y,
        width: body.width,
        height: body.height,
        color: PLAYER_COLOR,
        health_fraction: None,
        visible: player_visible(state.player.invulnerable_frames),
        trail: Vec::new(),
    });

    sprites.extend(state.enemies.iter().map(|e| SpriteView {
        kind: SpriteKind::Enemy(e.kind),
        x: e.body.x,
        y: e.body.y,
        width: e.body.width,
        height: e.body.height,
        color: e.color,
        health_fraction: (e.kind == EnemyKind::Boss).then(|| e.health_fraction()),
        visible: true,
        trail: Vec::new(),
    }));

    sprites.extend(state.player_shots.iter().map(|s| {
        let aabb = s.aabb();
        SpriteView {
            kind: SpriteKind::PlayerShot(s.weapon),
            x: aabb.x,
            y: aabb.y,
            width: aabb.width,
            height: aabb.height,
            color: s.color(),
            health_fraction: None,
            visible: true,
            trail: s.trail.clone(),
        }
    }));

    sprites.extend(state.enemy_shots.iter().map(|s| {
        let aabb = s.aabb();
        SpriteView {
            kind: SpriteKind::EnemyShot,
            x: aabb.x,
            y: aabb.y,
            width: aabb.width,
            height: aabb.height,
            color: ENEMY_SHOT.color,
            health_fraction: None,
            visible: true,
            trail: Vec::new(),
        }
    }));

    FrameSnapshot {
        field: state.field,
        hud: hud(state),
        sprites,
        events: state.events.clone(),
    }
}
