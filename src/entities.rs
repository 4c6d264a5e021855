//! All game entity types.  Pure data, no logic beyond small accessors.

use crate::tuning::{enemy_stats, weapon_stats, Rgb, Tuning, ENEMY_SHOT};

// ── Variants ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Basic,
    Jumper,
    Shooter,
    Runner,
    Boss,
}

/// Player weapons in unlock order.  `Pistol` is always available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    Pistol,
    BitBlaster,
    CrashLauncher,
    FogSpreader,
    FlareShot,
    HydroWave,
    GlitchLaser,
}

impl WeaponKind {
    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Pistol => "Pistol",
            WeaponKind::BitBlaster => "Bit Blaster",
            WeaponKind::CrashLauncher => "Crash Launcher",
            WeaponKind::FogSpreader => "Fog Spreader",
            WeaponKind::FlareShot => "Flare Shot",
            WeaponKind::HydroWave => "Hydro Wave",
            WeaponKind::GlitchLaser => "Glitch Laser",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

// ── Run state ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Title,
    Running,
    Paused,
    StageClear,
    GameOver,
    GameComplete,
}

#[derive(Clone, Debug)]
pub struct RunState {
    /// 1-based stage index.
    pub stage: u32,
    pub max_stage: u32,
    pub hp: u32,
    pub max_hp: u32,
    /// Index into `unlocked`.
    pub weapon: usize,
    /// Unlocked weapons in unlock order, never duplicated.
    pub unlocked: Vec<WeaponKind>,
    pub phase: Phase,
}

impl RunState {
    pub fn new(max_stage: u32, max_hp: u32) -> Self {
        RunState {
            stage: 1,
            max_stage,
            hp: max_hp,
            max_hp,
            weapon: 0,
            unlocked: vec![WeaponKind::Pistol],
            phase: Phase::Title,
        }
    }

    pub fn equipped(&self) -> WeaponKind {
        self.unlocked
            .get(self.weapon)
            .copied()
            .unwrap_or(WeaponKind::Pistol)
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// The play-field.  Origin is top-left, y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
    pub ground_thickness: f32,
}

impl Field {
    /// y coordinate of the top of the ground strip.
    pub fn ground_line(&self) -> f32 {
        self.height - self.ground_thickness
    }

    /// Lowest allowed top edge for an actor of the given height.
    pub fn floor_for(&self, actor_height: f32) -> f32 {
        self.ground_line() - actor_height
    }

    pub fn max_x_for(&self, actor_width: f32) -> f32 {
        (self.width - actor_width).max(0.0)
    }
}

/// Axis-aligned bounding box, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Position, size and velocity shared by every actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Body {
            x,
            y,
            width,
            height,
            vx: 0.0,
            vy: 0.0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    pub on_ground: bool,
    pub anim_frame: u8,
    pub anim_timer: u32,
    /// Frames of damage immunity left; zero means vulnerable.
    pub invulnerable_frames: u32,
}

impl Player {
    pub fn spawn(tuning: &Tuning, field: &Field) -> Self {
        Player {
            body: Body::new(
                tuning.spawn_x,
                field.height - tuning.spawn_height_offset,
                tuning.player_width,
                tuning.player_height,
            ),
            facing: Facing::Right,
            on_ground: false,
            anim_frame: 0,
            anim_timer: 0,
            invulnerable_frames: 0,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_frames > 0
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub hp: i32,
    pub max_hp: i32,
    pub speed: f32,
    pub damage: u32,
    pub direction: Facing,
    pub color: Rgb,
    pub jump_timer: u32,
    pub shoot_timer: u32,
    pub anim_frame: u8,
    pub anim_timer: u32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, x: f32, y: f32) -> Self {
        let stats = enemy_stats(&kind);
        Enemy {
            body: Body::new(x, y, stats.width, stats.height),
            kind,
            hp: stats.hp,
            max_hp: stats.hp,
            speed: stats.speed,
            damage: stats.damage,
            direction: Facing::Left,
            color: stats.color,
            jump_timer: 0,
            shoot_timer: 0,
            anim_frame: 0,
            anim_timer: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            0.0
        } else {
            (self.hp.max(0) as f32) / self.max_hp as f32
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A fading afterimage left behind by a player projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
}

/// Player shot.  Stats come from the weapon and are fixed at construction.
#[derive(Clone, Debug)]
pub struct PlayerProjectile {
    pub x: f32,
    pub y: f32,
    pub direction: Facing,
    pub weapon: WeaponKind,
    pub trail: Vec<TrailPoint>,
    speed: f32,
    damage: u32,
    width: f32,
    height: f32,
    color: Rgb,
}

impl PlayerProjectile {
    pub fn new(x: f32, y: f32, direction: Facing, weapon: WeaponKind) -> Self {
        let stats = weapon_stats(&weapon);
        PlayerProjectile {
            x,
            y,
            direction,
            weapon,
            trail: Vec::new(),
            speed: stats.speed,
            damage: stats.damage,
            width: stats.width,
            height: stats.height,
            color: stats.color,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Enemy shot travelling along a vector fixed at spawn time.
#[derive(Clone, Debug)]
pub struct EnemyProjectile {
    pub x: f32,
    pub y: f32,
    vx: f32,
    vy: f32,
    damage: u32,
    width: f32,
    height: f32,
}

impl EnemyProjectile {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        EnemyProjectile {
            x,
            y,
            vx,
            vy,
            damage: ENEMY_SHOT.damage,
            width: ENEMY_SHOT.width,
            height: ENEMY_SHOT.height,
        }
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

// ── Host interface ────────────────────────────────────────────────────────────

/// Input sampled once per frame.  `left`/`right` are held states; the rest
/// are one-shot presses collected since the previous frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
    pub cycle_weapon: bool,
}

/// Discrete notifications for the UI collaborator.  Cleared at the start of
/// every `tick`.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    StageStarted {
        stage: u32,
        name: &'static str,
    },
    PlayerDamaged {
        amount: u32,
        hp: u32,
    },
    EnemyDefeated {
        kind: EnemyKind,
    },
    WeaponChanged {
        weapon: WeaponKind,
    },
    StageCleared {
        stage: u32,
        boss: &'static str,
        unlocked: Option<WeaponKind>,
    },
    GameComplete {
        boss: &'static str,
        unlocked: Option<WeaponKind>,
    },
    GameOver {
        stage: u32,
    },
}

// ── Master game state ─────────────────────────────────────────────────────────

/// One play session.  Cloneable so the pure update functions in `compute`
/// can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub run: RunState,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_shots: Vec<PlayerProjectile>,
    pub enemy_shots: Vec<EnemyProjectile>,
    pub field: Field,
    pub tuning: Tuning,
    pub frame: u64,
    pub events: Vec<FrameEvent>,
}
