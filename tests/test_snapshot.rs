use cyber_stage::compute::{new_session, start_game};
use cyber_stage::entities::*;
use cyber_stage::snapshot::*;
use cyber_stage::tuning::{Tuning, ENEMY_SHOT, PLAYER_COLOR};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn field() -> Field {
    Field {
        width: 800.0,
        height: 600.0,
        ground_thickness: 100.0,
    }
}

fn started() -> GameSession {
    let mut rng = StdRng::seed_from_u64(42);
    start_game(&new_session(field(), Tuning::default()), &mut rng)
}

fn player_sprite(snap: &FrameSnapshot) -> &SpriteView {
    &snap.sprites[0]
}

#[test]
fn hud_reflects_run_state() {
    let hud = hud(&started());
    assert_eq!(hud.phase, Phase::Running);
    assert_eq!(hud.stage, 1);
    assert_eq!(hud.stage_name, "Stage 1: Binary Highway");
    assert_eq!(hud.weapon, "Pistol");
    assert_eq!(hud.hp, 100);
    assert_eq!(hud.health_fraction, 1.0);
    assert_eq!(hud.enemy_count, 5);
    assert_eq!(hud.shot_count, 0);
}

#[test]
fn sprites_listed_in_draw_order() {
    let mut s = started();
    s.player_shots
        .push(PlayerProjectile::new(10.0, 10.0, Facing::Right, WeaponKind::Pistol));
    s.enemy_shots.push(EnemyProjectile::new(20.0, 20.0, 1.0, 0.0));

    let snap = snapshot(&s);
    assert_eq!(snap.sprites.len(), 1 + 5 + 1 + 1);
    assert_eq!(snap.sprites[0].kind, SpriteKind::Player);
    assert_eq!(snap.sprites[0].color, PLAYER_COLOR);
    assert!(matches!(snap.sprites[1].kind, SpriteKind::Enemy(_)));
    assert_eq!(snap.sprites[6].kind, SpriteKind::PlayerShot(WeaponKind::Pistol));
    assert_eq!(snap.sprites[7].kind, SpriteKind::EnemyShot);
    assert_eq!(snap.sprites[7].color, ENEMY_SHOT.color);
}

#[test]
fn only_the_boss_carries_a_health_bar() {
    let mut s = started();
    s.enemies[4].hp = 25;
    let snap = snapshot(&s);

    let bars: Vec<Option<f32>> = snap.sprites[1..6].iter().map(|v| v.health_fraction).collect();
    assert_eq!(bars, vec![None, None, None, None, Some(0.25)]);
    assert_eq!(snap.sprites[5].kind, SpriteKind::Enemy(EnemyKind::Boss));
}

#[test]
fn player_blinks_while_invulnerable() {
    let mut s = started();
    assert!(player_sprite(&snapshot(&s)).visible);

    s.player.invulnerable_frames = 55;
    assert!(!player_sprite(&snapshot(&s)).visible);

    s.player.invulnerable_frames = 60;
    assert!(player_sprite(&snapshot(&s)).visible);
}

#[test]
fn shot_sprites_carry_trail() {
    let mut s = started();
    let mut shot = PlayerProjectile::new(10.0, 10.0, Facing::Right, WeaponKind::BitBlaster);
    shot.trail.push(TrailPoint {
        x: 4.0,
        y: 10.0,
        alpha: 0.7,
    });
    s.player_shots.push(shot);

    let snap = snapshot(&s);
    let view = snap.sprites.last().unwrap();
    assert_eq!(view.trail.len(), 1);
    assert_eq!((view.width, view.height), (6.0, 6.0));
}

#[test]
fn snapshot_copies_field_and_events() {
    let s = started();
    let snap = snapshot(&s);
    assert_eq!(snap.field, field());
    assert_eq!(snap.events, s.events);
    assert_eq!(snap.hud, hud(&s));
}
