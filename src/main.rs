//! Mining Missile demo
//!
//! Flies one missile through a headless frame loop and prints what it did.
//!
//! Usage: `mining-missile [tuning.json] [seed] [impact_secs]`

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use glam::Vec2;

use mining_missile::consts::{FRAME_DT, MAX_DEMO_FRAMES, OBSTACLE_TAG};
use mining_missile::sim::{
    Damage, KinematicBody, MiningMissile, MissileEvent, MissileServices, ParticleField,
    ParticleTemplate, PlayerStats,
};
use mining_missile::{AudioClip, MissileTuning, SfxManager};

/// Launch velocity of the demo missile (units/s)
const LAUNCH_VELOCITY: Vec2 = Vec2::new(240.0, 60.0);

/// Tuning used when no file is given
fn demo_tuning() -> MissileTuning {
    MissileTuning {
        lifetime_secs: 2.0,
        standard_impact_clips: vec![
            AudioClip::new("mining_missile_impact_01"),
            AudioClip::new("mining_missile_impact_02"),
        ],
        flight_particles: Some(ParticleTemplate::new("missile_smoke", 0.6)),
        collision_particles: Some(ParticleTemplate::new("missile_debris", 1.0)),
        ..Default::default()
    }
}

fn main() {
    env_logger::init();
    log::info!("Mining Missile demo starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) if path != "-" => MissileTuning::load_or_default(Path::new(&path)),
        _ => demo_tuning(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let impact_at: Option<f32> = args.next().and_then(|s| s.parse().ok());

    let body = Rc::new(RefCell::new(KinematicBody::new(Vec2::ZERO, LAUNCH_VELOCITY)));
    let field = Rc::new(RefCell::new(ParticleField::new()));
    let sfx = Rc::new(RefCell::new(SfxManager::new()));
    let damage = Rc::new(RefCell::new(Damage::default()));

    let services = MissileServices::new()
        .with_body(Rc::clone(&body))
        .with_particles(Rc::clone(&field))
        .with_sfx(Rc::clone(&sfx))
        .with_damage(Rc::clone(&damage))
        .with_stats(PlayerStats { mining_skill: 4.0 });
    let mut missile = MiningMissile::spawn(tuning, services, seed);

    println!(
        "Launched with damage {:.1}, velocity {:?}",
        damage.borrow().amount,
        missile.velocity()
    );

    let mut frames = 0;
    let mut impact_sent = false;
    while missile.is_alive() && frames < MAX_DEMO_FRAMES {
        frames += 1;
        let time = frames as f32 * FRAME_DT;

        // Host side of the frame: physics, effects, behaviors, then triggers
        body.borrow_mut().step(FRAME_DT);
        field.borrow_mut().step(FRAME_DT);

        missile.update(FRAME_DT);

        // Overlaps found this frame are handled by next frame's update
        if !impact_sent && impact_at.is_some_and(|t| time >= t) {
            missile.on_trigger_enter(OBSTACLE_TAG);
            impact_sent = true;
        }

        for event in missile.drain_events() {
            match event {
                MissileEvent::Accelerated => {
                    println!("[{time:6.3}s] boost -> velocity {:?}", missile.velocity());
                }
                MissileEvent::SmokeSpawned { pos } => {
                    println!("[{time:6.3}s] smoke at ({:.1}, {:.1})", pos.x, pos.y);
                }
                MissileEvent::ImpactSound { clip } => {
                    println!("[{time:6.3}s] impact sound '{clip}'");
                }
                MissileEvent::ImpactParticles { handle, pos } => {
                    println!(
                        "[{time:6.3}s] impact burst #{} at ({:.1}, {:.1})",
                        handle.0, pos.x, pos.y
                    );
                }
                MissileEvent::Destroyed { cause } => {
                    println!("[{time:6.3}s] destroyed ({cause:?})");
                }
            }
        }
    }

    println!(
        "\n{} frames, {} particles spawned, {} sounds played",
        frames,
        field.borrow().spawned(),
        sfx.borrow().played().len()
    );
}
