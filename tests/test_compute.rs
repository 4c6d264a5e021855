use cyber_stage::compute::*;
use cyber_stage::entities::*;
use cyber_stage::tuning::Tuning;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn field() -> Field {
    Field {
        width: 800.0,
        height: 600.0,
        ground_thickness: 100.0,
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Running session with no roster.  Tests that tick it add an enemy first so
/// the stage does not clear on the spot.
fn running_state() -> GameSession {
    let mut s = new_session(field(), Tuning::default());
    s.run.phase = Phase::Running;
    s
}

/// Running session with one harmless enemy parked far from the player.
fn guarded_state() -> GameSession {
    let mut s = running_state();
    s.enemies.push(Enemy::new(EnemyKind::Basic, 700.0, 476.0));
    s
}

fn idle() -> FrameInput {
    FrameInput::default()
}

fn ticks(state: &GameSession, n: usize) -> GameSession {
    let mut s = state.clone();
    for _ in 0..n {
        s = tick(&s, &idle());
    }
    s
}

fn count_events(s: &GameSession, pred: impl Fn(&FrameEvent) -> bool) -> usize {
    s.events.iter().filter(|e| pred(e)).count()
}

// ── Session lifecycle ─────────────────────────────────────────────────────────

#[test]
fn new_session_waits_on_title() {
    let s = new_session(field(), Tuning::default());
    assert_eq!(s.run.phase, Phase::Title);
    assert!(s.enemies.is_empty());
    assert_eq!(s.frame, 0);

    let after = tick(&s, &idle());
    assert_eq!(after.frame, 0);
    assert_eq!(after.run.phase, Phase::Title);
}

#[test]
fn start_game_enters_stage_one() {
    let s = start_game(&new_session(field(), Tuning::default()), &mut seeded_rng());
    assert_eq!(s.run.phase, Phase::Running);
    assert_eq!(s.run.stage, 1);
    assert_eq!(s.run.hp, 100);
    assert_eq!(s.enemies.len(), 5);
    assert_eq!(
        s.events,
        vec![FrameEvent::StageStarted {
            stage: 1,
            name: "Stage 1: Binary Highway",
        }]
    );
}

#[test]
fn start_game_from_game_over_resets_run() {
    let mut s = running_state();
    s.run.stage = 4;
    s.run.hp = 0;
    s.run.unlocked.push(WeaponKind::BitBlaster);
    s.run.phase = Phase::GameOver;
    s.player_shots
        .push(PlayerProjectile::new(5.0, 5.0, Facing::Right, WeaponKind::Pistol));

    let s = start_game(&s, &mut seeded_rng());
    assert_eq!(s.run.stage, 1);
    assert_eq!(s.run.hp, 100);
    assert_eq!(s.run.unlocked, vec![WeaponKind::Pistol]);
    assert!(s.player_shots.is_empty());
    assert_eq!(s.player.body.x, 100.0);
}

#[test]
fn input_is_immutable() {
    let s = guarded_state();
    let _ = tick(&s, &idle());
    assert_eq!(s.frame, 0);
    assert_eq!(s.player.body.y, 400.0);
}

#[test]
fn return_to_title_drops_the_run() {
    let s = start_game(&running_state(), &mut seeded_rng());
    let s = return_to_title(&s);
    assert_eq!(s.run.phase, Phase::Title);
    assert!(s.enemies.is_empty());
}

// ── Pause ─────────────────────────────────────────────────────────────────────

#[test]
fn pause_freezes_the_world() {
    let s = toggle_pause(&guarded_state());
    assert_eq!(s.run.phase, Phase::Paused);

    let frozen = ticks(&s, 10);
    assert_eq!(frozen.frame, 0);
    assert_eq!(frozen.player.body.y, 400.0);
    assert_eq!(frozen.enemies[0].body.x, 700.0);

    let resumed = toggle_pause(&frozen);
    assert_eq!(resumed.run.phase, Phase::Running);
}

#[test]
fn pause_ignored_outside_play() {
    let s = new_session(field(), Tuning::default());
    assert_eq!(toggle_pause(&s).run.phase, Phase::Title);
}

// ── Player input ──────────────────────────────────────────────────────────────

#[test]
fn move_helpers_steer_only_while_running() {
    let s = move_player_left(&guarded_state());
    assert_eq!(s.player.body.vx, -5.0);
    assert_eq!(s.player.facing, Facing::Left);

    let s = move_player_right(&s);
    assert_eq!(s.player.body.vx, 5.0);

    let title = new_session(field(), Tuning::default());
    assert_eq!(move_player_left(&title).player.body.vx, 0.0);
}

#[test]
fn player_shoot_adds_one_shot() {
    let s = player_shoot(&guarded_state());
    assert_eq!(s.player_shots.len(), 1);
    assert_eq!(s.player_shots[0].x, 132.0);
    assert_eq!(s.player_shots[0].weapon, WeaponKind::Pistol);

    let s = player_shoot(&s);
    assert_eq!(s.player_shots.len(), 2);
}

#[test]
fn shoot_input_fires_then_moves_shot() {
    let input = FrameInput {
        shoot: true,
        ..FrameInput::default()
    };
    let s = tick(&guarded_state(), &input);
    assert_eq!(s.player_shots.len(), 1);
    assert_eq!(s.player_shots[0].x, 144.0);
    assert_eq!(s.player_shots[0].y, 424.0);
}

#[test]
fn jump_requires_ground() {
    // Mid-air at spawn: jump does nothing.
    let airborne = player_jump(&guarded_state());
    assert_eq!(airborne.player.body.vy, 0.0);

    let landed = ticks(&guarded_state(), 11);
    assert!(landed.player.on_ground);
    assert_eq!(landed.player.body.y, 452.0);

    let input = FrameInput {
        jump: true,
        ..FrameInput::default()
    };
    let s = tick(&landed, &input);
    assert!(!s.player.on_ground);
    assert!(s.player.body.y < 452.0);
}

#[test]
fn cycle_weapon_emits_change() {
    let mut s = guarded_state();
    s.run.unlocked.push(WeaponKind::BitBlaster);

    let input = FrameInput {
        cycle_weapon: true,
        ..FrameInput::default()
    };
    let s = tick(&s, &input);
    assert_eq!(s.run.equipped(), WeaponKind::BitBlaster);
    assert!(s.events.contains(&FrameEvent::WeaponChanged {
        weapon: WeaponKind::BitBlaster
    }));

    let s = cycle_weapon(&s);
    assert_eq!(s.run.equipped(), WeaponKind::Pistol);
}

#[test]
fn cycle_with_single_weapon_is_silent() {
    let s = cycle_weapon(&guarded_state());
    assert_eq!(s.run.weapon, 0);
    assert!(s.events.is_empty());
}

#[test]
fn actions_between_frames_match_frame_input() {
    let landed = ticks(&guarded_state(), 11);

    let input = FrameInput {
        right: true,
        jump: true,
        shoot: true,
        ..FrameInput::default()
    };
    let sampled = tick(&landed, &input);

    let stepped = move_player_right(&player_shoot(&player_jump(&landed)));
    let stepped = tick(&stepped, &idle());

    assert_eq!(sampled.player.body, stepped.player.body);
    assert_eq!(sampled.player.facing, stepped.player.facing);
    assert_eq!(sampled.player_shots.len(), 1);
    assert_eq!(stepped.player_shots.len(), 1);
    assert_eq!(sampled.player_shots[0].x, stepped.player_shots[0].x);
    assert_eq!(sampled.player_shots[0].y, stepped.player_shots[0].y);
}

#[test]
fn actions_ignored_outside_play() {
    let mut paused = toggle_pause(&guarded_state());
    paused.run.unlocked.push(WeaponKind::BitBlaster);

    let s = cycle_weapon(&player_shoot(&move_player_right(&paused)));
    assert!(s.player_shots.is_empty());
    assert_eq!(s.run.weapon, 0);
    assert_eq!(s.player.body.vx, 0.0);
}

// ── Damage & invulnerability ──────────────────────────────────────────────────

#[test]
fn invulnerability_window_blocks_repeat_damage() {
    let s = damage_player(&guarded_state(), 15);
    assert_eq!(s.run.hp, 85);
    assert_eq!(
        s.events,
        vec![FrameEvent::PlayerDamaged { amount: 15, hp: 85 }]
    );

    let s = ticks(&s, 30);
    let s = damage_player(&s, 15);
    assert_eq!(s.run.hp, 85);

    let s = ticks(&s, 31);
    let s = damage_player(&s, 15);
    assert_eq!(s.run.hp, 70);
}

#[test]
fn events_hold_only_latest_call() {
    let s = damage_player(&guarded_state(), 15);
    assert!(!s.events.is_empty());
    let s = tick(&s, &idle());
    assert!(s.events.is_empty());
}

#[test]
fn contact_damage_can_end_the_run() {
    let mut s = running_state();
    s.run.hp = 10;
    s.enemies.push(Enemy::new(EnemyKind::Basic, 110.0, 410.0));

    let s = tick(&s, &idle());
    assert_eq!(s.run.phase, Phase::GameOver);
    assert_eq!(s.run.hp, 0);
    assert_eq!(
        count_events(&s, |e| matches!(e, FrameEvent::GameOver { .. })),
        1
    );

    let after = tick(&s, &idle());
    assert_eq!(after.frame, s.frame);
    assert!(after.events.is_empty());
}

#[test]
fn enemy_shot_damages_and_is_removed() {
    let mut s = guarded_state();
    s.enemy_shots.push(EnemyProjectile::new(110.0, 420.0, 0.0, 0.0));
    s.enemy_shots.push(EnemyProjectile::new(115.0, 420.0, 0.0, 0.0));

    let s = tick(&s, &idle());
    // Both shots are consumed; the second lands during invulnerability.
    assert!(s.enemy_shots.is_empty());
    assert_eq!(s.run.hp, 85);
}

// ── Shots & stage progression ─────────────────────────────────────────────────

#[test]
fn off_field_shots_are_dropped() {
    let mut s = guarded_state();
    s.player_shots
        .push(PlayerProjectile::new(845.0, 100.0, Facing::Right, WeaponKind::Pistol));
    s.player_shots
        .push(PlayerProjectile::new(400.0, 100.0, Facing::Right, WeaponKind::Pistol));

    let s = tick(&s, &idle());
    assert_eq!(s.player_shots.len(), 1);
    assert_eq!(s.player_shots[0].x, 412.0);
}

#[test]
fn clearing_the_roster_clears_the_stage() {
    let mut s = running_state();
    let mut enemy = Enemy::new(EnemyKind::Basic, 400.0, 476.0);
    enemy.hp = 10;
    s.enemies.push(enemy);
    s.player_shots
        .push(PlayerProjectile::new(390.0, 480.0, Facing::Right, WeaponKind::Pistol));

    let s = tick(&s, &idle());
    assert!(s.enemies.is_empty());
    assert!(s.player_shots.is_empty());
    assert_eq!(s.run.phase, Phase::StageClear);
    assert!(s.events.contains(&FrameEvent::EnemyDefeated {
        kind: EnemyKind::Basic
    }));
    assert!(s.events.contains(&FrameEvent::StageCleared {
        stage: 1,
        boss: "Bit Master",
        unlocked: Some(WeaponKind::BitBlaster),
    }));
    assert_eq!(s.run.unlocked, vec![WeaponKind::Pistol, WeaponKind::BitBlaster]);
}

#[test]
fn simultaneous_kills_clear_once() {
    let mut s = running_state();
    for _ in 0..2 {
        let mut enemy = Enemy::new(EnemyKind::Basic, 400.0, 476.0);
        enemy.hp = 10;
        s.enemies.push(enemy);
        s.player_shots
            .push(PlayerProjectile::new(390.0, 480.0, Facing::Right, WeaponKind::Pistol));
    }

    let s = tick(&s, &idle());
    assert_eq!(
        count_events(&s, |e| matches!(e, FrameEvent::EnemyDefeated { .. })),
        2
    );
    assert_eq!(
        count_events(&s, |e| matches!(e, FrameEvent::StageCleared { .. })),
        1
    );
}

#[test]
fn game_over_wins_over_same_frame_clear() {
    let mut s = running_state();
    s.run.hp = 10;
    let mut enemy = Enemy::new(EnemyKind::Basic, 110.0, 410.0);
    enemy.hp = 10;
    s.enemies.push(enemy);
    s.player_shots
        .push(PlayerProjectile::new(105.0, 415.0, Facing::Right, WeaponKind::Pistol));

    let s = tick(&s, &idle());
    assert!(s.enemies.is_empty());
    assert_eq!(s.run.phase, Phase::GameOver);
    assert_eq!(
        count_events(&s, |e| matches!(e, FrameEvent::StageCleared { .. })),
        0
    );
}

#[test]
fn final_stage_clear_completes_game() {
    let mut s = running_state();
    s.run.stage = 7;
    let mut enemy = Enemy::new(EnemyKind::Boss, 400.0, 436.0);
    enemy.hp = 10;
    s.enemies.push(enemy);
    s.player_shots
        .push(PlayerProjectile::new(390.0, 460.0, Facing::Right, WeaponKind::Pistol));

    let s = tick(&s, &idle());
    assert_eq!(s.run.phase, Phase::GameComplete);
    assert!(s.events.contains(&FrameEvent::GameComplete {
        boss: "Error Omega",
        unlocked: None,
    }));
}

#[test]
fn next_stage_only_from_stage_clear() {
    let mut rng = seeded_rng();
    let running = guarded_state();
    let unchanged = next_stage(&running, &mut rng);
    assert_eq!(unchanged.run.stage, 1);

    let mut cleared = running_state();
    cleared.run.phase = Phase::StageClear;
    cleared.run.hp = 40;
    let s = next_stage(&cleared, &mut rng);
    assert_eq!(s.run.stage, 2);
    assert_eq!(s.run.hp, 100);
    assert_eq!(s.run.phase, Phase::Running);
    assert_eq!(s.enemies.len(), 6);
    assert_eq!(s.player.body.x, 100.0);
}

// ── Whole-run properties ──────────────────────────────────────────────────────

#[test]
fn actors_stay_in_bounds_through_a_run() {
    let mut s = start_game(&new_session(field(), Tuning::default()), &mut seeded_rng());
    for frame in 0..1500 {
        let input = FrameInput {
            left: frame % 200 >= 100,
            right: frame % 200 < 100,
            jump: frame % 30 == 0,
            shoot: frame % 8 == 0,
            cycle_weapon: false,
        };
        s = tick(&s, &input);

        let p = &s.player.body;
        assert!(p.x >= 0.0 && p.x + p.width <= 800.0);
        assert!(p.y >= 0.0 && p.y + p.height <= 500.0);
        assert!(s.run.hp <= s.run.max_hp);
        for e in &s.enemies {
            assert!(e.body.x >= 0.0 && e.body.x + e.body.width <= 800.0);
            assert!(e.body.y + e.body.height <= 500.0);
        }
        if s.run.phase != Phase::Running {
            break;
        }
    }
}
