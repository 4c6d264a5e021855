//! Stage table, roster generation and run progression.

use rand::Rng;
use tracing::{debug, info};

use crate::entities::{Enemy, EnemyKind, Field, FrameEvent, Phase, RunState, WeaponKind};
use crate::tuning::{Tuning, STAGE_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageInfo {
    pub name: &'static str,
    pub boss: &'static str,
    /// Weapon awarded when the stage is cleared.
    pub weapon: Option<WeaponKind>,
}

pub const STAGES: [StageInfo; STAGE_COUNT as usize] = [
    StageInfo {
        name: "Stage 1: Binary Highway",
        boss: "Bit Master",
        weapon: Some(WeaponKind::BitBlaster),
    },
    StageInfo {
        name: "Stage 2: Data Underpass",
        boss: "Crash Worm",
        weapon: Some(WeaponKind::CrashLauncher),
    },
    StageInfo {
        name: "Stage 3: Cloud Tower",
        boss: "Fog Keeper",
        weapon: Some(WeaponKind::FogSpreader),
    },
    StageInfo {
        name: "Stage 4: Firewall Factory",
        boss: "Flare Machine",
        weapon: Some(WeaponKind::FlareShot),
    },
    StageInfo {
        name: "Stage 5: Cyber Strait",
        boss: "Hydro Code",
        weapon: Some(WeaponKind::HydroWave),
    },
    StageInfo {
        name: "Stage 6: Bug Ruins",
        boss: "Glitch King",
        weapon: Some(WeaponKind::GlitchLaser),
    },
    StageInfo {
        name: "Stage 7: Central Control Tower",
        boss: "Error Omega",
        weapon: None,
    },
];

/// Look up a 1-based stage; out-of-range indices clamp to the table.
pub fn stage_info(stage: u32) -> &'static StageInfo {
    let index = stage.clamp(1, STAGE_COUNT) as usize - 1;
    &STAGES[index]
}

/// Archetypes drawn for the regular part of a roster.
pub const REGULAR_KINDS: [EnemyKind; 3] = [EnemyKind::Jumper, EnemyKind::Shooter, EnemyKind::Runner];

/// `roster_base + stage` regular enemies of random kind, evenly spaced, then
/// the boss last near the right edge.
pub fn spawn_roster(stage: u32, field: &Field, tuning: &Tuning, rng: &mut impl Rng) -> Vec<Enemy> {
    let count = tuning.roster_base + stage;
    let y = field.height - tuning.roster_height_offset;

    let mut roster: Vec<Enemy> = (0..count)
        .map(|i| {
            let kind = REGULAR_KINDS[rng.gen_range(0..REGULAR_KINDS.len())];
            let x = tuning.roster_start_x + i as f32 * tuning.roster_spacing;
            Enemy::new(kind, x, y)
        })
        .collect();

    roster.push(Enemy::new(
        EnemyKind::Boss,
        field.width - tuning.boss_edge_offset,
        field.height - tuning.boss_height_offset,
    ));
    roster
}

// ── Weapons ───────────────────────────────────────────────────────────────────

/// Append `weapon` to the unlocked list unless already present.
pub fn unlock_weapon(run: &mut RunState, weapon: WeaponKind) -> bool {
    if run.unlocked.contains(&weapon) {
        return false;
    }
    run.unlocked.push(weapon);
    info!(weapon = weapon.name(), "weapon unlocked");
    true
}

/// Equip the next unlocked weapon, wrapping around.  No-op with fewer than
/// two weapons.
pub fn cycle_weapon(run: &mut RunState) -> Option<WeaponKind> {
    if run.unlocked.len() < 2 {
        return None;
    }
    run.weapon = (run.weapon + 1) % run.unlocked.len();
    let weapon = run.equipped();
    debug!(weapon = weapon.name(), "weapon cycled");
    Some(weapon)
}

// ── Transitions ───────────────────────────────────────────────────────────────

/// Back to stage 1 with full health and only the base weapon.
pub fn reset_run(run: &mut RunState) {
    *run = RunState::new(run.max_stage, run.max_hp);
}

/// Resolve the end of a stage whose roster is empty: award the stage weapon
/// and move to `StageClear`, or `GameComplete` on the last stage.
pub fn clear_stage(run: &mut RunState, events: &mut Vec<FrameEvent>) -> Phase {
    let info = stage_info(run.stage);
    let unlocked = info.weapon.filter(|&weapon| unlock_weapon(run, weapon));

    if run.stage >= run.max_stage {
        run.phase = Phase::GameComplete;
        events.push(FrameEvent::GameComplete {
            boss: info.boss,
            unlocked,
        });
        info!(stage = run.stage, boss = info.boss, "game complete");
    } else {
        run.phase = Phase::StageClear;
        events.push(FrameEvent::StageCleared {
            stage: run.stage,
            boss: info.boss,
            unlocked,
        });
        info!(stage = run.stage, boss = info.boss, "stage cleared");
    }
    run.phase
}

/// Step past a cleared stage: next index, full health.
pub fn advance_stage(run: &mut RunState) {
    run.stage += 1;
    run.hp = run.max_hp;
    run.phase = Phase::Running;
}
