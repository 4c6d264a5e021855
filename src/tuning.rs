//! Gameplay tuning.
//!
//! `Tuning` holds the physics and session constants and may be overridden
//! from a TOML file (see `config`).  Per-variant stats are fixed tables
//! selected by `match`; they never change after an entity is built.

use serde::Deserialize;

use crate::entities::{EnemyKind, WeaponKind};
use crate::error::ConfigError;

/// Stages shipped in the stage table.  `max_stage` may be lowered, not raised.
pub const STAGE_COUNT: u32 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tuning {
    /// Vertical acceleration in units/frame².
    pub gravity: f32,
    /// Per-frame multiplier applied to the player's horizontal velocity.
    pub friction: f32,
    /// Horizontal speeds below this snap to zero.
    pub friction_epsilon: f32,
    pub player_speed: f32,
    pub jump_power: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub invulnerability_frames: u32,
    pub ground_thickness: f32,
    /// Projectiles further than this beyond any edge are discarded.
    pub offscreen_margin: f32,
    pub enemy_shot_speed: f32,
    pub enemy_jump_power: f32,
    pub jump_interval: u32,
    pub shoot_interval: u32,
    pub player_anim_interval: u32,
    pub enemy_anim_interval: u32,
    pub trail_fade: f32,
    pub max_stage: u32,
    pub max_hp: u32,

    // Spawn geometry.  Heights are measured up from the bottom of the field.
    pub spawn_x: f32,
    pub spawn_height_offset: f32,
    pub roster_base: u32,
    pub roster_start_x: f32,
    pub roster_spacing: f32,
    pub roster_height_offset: f32,
    pub boss_edge_offset: f32,
    pub boss_height_offset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            friction: 0.8,
            friction_epsilon: 0.01,
            player_speed: 5.0,
            jump_power: 15.0,
            player_width: 32.0,
            player_height: 48.0,
            invulnerability_frames: 60,
            ground_thickness: 100.0,
            offscreen_margin: 50.0,
            enemy_shot_speed: 5.0,
            enemy_jump_power: 15.0,
            jump_interval: 120,
            shoot_interval: 90,
            player_anim_interval: 10,
            enemy_anim_interval: 20,
            trail_fade: 0.1,
            max_stage: STAGE_COUNT,
            max_hp: 100,
            spawn_x: 100.0,
            spawn_height_offset: 200.0,
            roster_base: 3,
            roster_start_x: 200.0,
            roster_spacing: 150.0,
            roster_height_offset: 150.0,
            boss_edge_offset: 150.0,
            boss_height_offset: 200.0,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("gravity", self.gravity),
            ("player_speed", self.player_speed),
            ("jump_power", self.jump_power),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("enemy_shot_speed", self.enemy_shot_speed),
            ("enemy_jump_power", self.enemy_jump_power),
            ("trail_fade", self.trail_fade),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("friction_epsilon", self.friction_epsilon),
            ("ground_thickness", self.ground_thickness),
            ("offscreen_margin", self.offscreen_margin),
            ("spawn_x", self.spawn_x),
            ("spawn_height_offset", self.spawn_height_offset),
            ("roster_start_x", self.roster_start_x),
            ("roster_spacing", self.roster_spacing),
            ("roster_height_offset", self.roster_height_offset),
            ("boss_edge_offset", self.boss_edge_offset),
            ("boss_height_offset", self.boss_height_offset),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and not negative, got {value}"
                )));
            }
        }

        if !(0.0..1.0).contains(&self.friction) {
            return Err(ConfigError::Invalid(format!(
                "friction must be in [0, 1), got {}",
                self.friction
            )));
        }
        if self.max_stage == 0 || self.max_stage > STAGE_COUNT {
            return Err(ConfigError::Invalid(format!(
                "max_stage must be in 1..={STAGE_COUNT}, got {}",
                self.max_stage
            )));
        }
        if self.max_hp == 0 {
            return Err(ConfigError::Invalid("max_hp must be at least 1".to_string()));
        }
        if self.jump_interval == 0 || self.shoot_interval == 0 {
            return Err(ConfigError::Invalid("timer intervals must be at least 1".to_string()));
        }
        Ok(())
    }
}

// ── Per-variant tables ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct EnemyStats {
    pub width: f32,
    pub height: f32,
    pub hp: i32,
    pub speed: f32,
    /// Contact damage dealt to the player per overlapping frame.
    pub damage: u32,
    pub color: Rgb,
}

const BASE_ENEMY: EnemyStats = EnemyStats {
    width: 24.0,
    height: 24.0,
    hp: 30,
    speed: 1.0,
    damage: 10,
    color: Rgb(0x33, 0x66, 0xff),
};

pub fn enemy_stats(kind: &EnemyKind) -> EnemyStats {
    match kind {
        EnemyKind::Basic => BASE_ENEMY,
        EnemyKind::Jumper => EnemyStats {
            color: Rgb(0x66, 0x99, 0xff),
            ..BASE_ENEMY
        },
        EnemyKind::Shooter => EnemyStats {
            speed: 0.0,
            color: Rgb(0x33, 0x55, 0xff),
            ..BASE_ENEMY
        },
        EnemyKind::Runner => EnemyStats {
            speed: 3.0,
            color: Rgb(0x33, 0xcc, 0xff),
            ..BASE_ENEMY
        },
        EnemyKind::Boss => EnemyStats {
            width: 64.0,
            height: 64.0,
            hp: 100,
            speed: 2.0,
            damage: 20,
            color: Rgb(0xff, 0x00, 0x00),
        },
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WeaponStats {
    pub speed: f32,
    pub damage: u32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

const BASE_WEAPON: WeaponStats = WeaponStats {
    speed: 12.0,
    damage: 10,
    width: 6.0,
    height: 6.0,
    color: Rgb(0xff, 0xff, 0x00),
};

pub fn weapon_stats(kind: &WeaponKind) -> WeaponStats {
    match kind {
        WeaponKind::Pistol => WeaponStats {
            color: Rgb(0xff, 0xff, 0x55),
            ..BASE_WEAPON
        },
        WeaponKind::BitBlaster => WeaponStats {
            speed: 15.0,
            color: Rgb(0x55, 0xff, 0xff),
            ..BASE_WEAPON
        },
        WeaponKind::CrashLauncher => WeaponStats {
            damage: 25,
            width: 12.0,
            height: 8.0,
            color: Rgb(0xff, 0x66, 0x00),
            ..BASE_WEAPON
        },
        WeaponKind::FogSpreader
        | WeaponKind::FlareShot
        | WeaponKind::HydroWave
        | WeaponKind::GlitchLaser => BASE_WEAPON,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ShotStats {
    pub damage: u32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

pub const ENEMY_SHOT: ShotStats = ShotStats {
    damage: 15,
    width: 6.0,
    height: 6.0,
    color: Rgb(0xff, 0x00, 0x00),
};

pub const PLAYER_COLOR: Rgb = Rgb(0x00, 0xff, 0x41);
