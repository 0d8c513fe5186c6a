//! Per-frame missile update and trigger reaction
//!
//! The host calls [`MiningMissile::update`] once per rendered frame and
//! [`MiningMissile::on_trigger_enter`] whenever the missile's trigger starts
//! overlapping something. Nothing else drives the missile.

use rand::Rng;

use super::follow::FollowTask;
use super::state::{DestroyCause, MiningMissile, MissileEvent, Stage};
use crate::consts::OBSTACLE_TAG;

impl MiningMissile {
    /// Advance the missile by one frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        match self.stage {
            Stage::Destroyed(_) => return,
            Stage::Destroying => {
                // Still alive for this frame, so the effect gets one last copy
                self.tick_follow();
                self.destroy(DestroyCause::Impact);
                return;
            }
            Stage::Flying => {}
        }

        // Removal happens at the end of the frame, like an engine's deferred destroy
        let expired = self.tick_lifetime(dt);
        self.tick_acceleration(dt);
        self.tick_smoke(dt);

        if expired {
            self.destroy(DestroyCause::Expired);
        }
    }

    /// React to a trigger overlap with a region tagged `tag`.
    ///
    /// Returns `true` if this started the impact sequence.
    pub fn on_trigger_enter(&mut self, tag: &str) -> bool {
        if tag != OBSTACLE_TAG {
            return false;
        }
        if self.stage != Stage::Flying {
            return false;
        }

        log::info!("Missile collided with an obstacle at {:?}", self.position());
        self.play_impact_sound();
        self.spawn_collision_particles();

        log::info!("Missile self destructing");
        self.stage = Stage::Destroying;
        true
    }

    /// Count down the self-destruct timer. Returns `true` once it runs out.
    fn tick_lifetime(&mut self, dt: f32) -> bool {
        self.remaining_lifetime -= dt;
        self.remaining_lifetime <= 0.0
    }

    fn tick_acceleration(&mut self, dt: f32) {
        if self.has_accelerated {
            return;
        }

        self.acceleration_elapsed += dt;
        if self.acceleration_elapsed < self.tuning.acceleration_delay_secs {
            return;
        }

        if let Some(body) = self.services.body.as_mut() {
            let vel = body.velocity();
            body.set_velocity(vel / self.tuning.start_speed_fraction);
        }
        self.has_accelerated = true;
        self.events.push(MissileEvent::Accelerated);
        log::info!("Missile accelerated to full speed");
    }

    fn tick_smoke(&mut self, dt: f32) {
        self.smoke_countdown -= dt;
        if self.smoke_countdown > 0.0 {
            return;
        }

        let pos = self.position();
        if let (Some(template), Some(spawner)) = (
            self.tuning.flight_particles.as_ref(),
            self.services.particles.as_mut(),
        ) {
            spawner.spawn_at(template, pos);
            self.events.push(MissileEvent::SmokeSpawned { pos });
            log::debug!("Smoke puff at {:?}", pos);
        }

        self.smoke_countdown = self.tuning.smoke_base_interval + self.smoke_jitter();
    }

    /// Uniform extra delay in [jitter_min, jitter_max]
    fn smoke_jitter(&mut self) -> f32 {
        let (min, max) = (self.tuning.smoke_jitter_min, self.tuning.smoke_jitter_max);
        if max > min {
            self.rng.random_range(min..=max)
        } else {
            min
        }
    }

    fn play_impact_sound(&mut self) {
        let Some(sfx) = self.services.sfx.as_mut() else {
            return;
        };
        let clips = &self.tuning.standard_impact_clips;
        if clips.is_empty() {
            return;
        }

        let clip = &clips[self.rng.random_range(0..clips.len())];
        sfx.play_sfx(clip);
        self.events.push(MissileEvent::ImpactSound { clip: clip.clone() });
    }

    fn spawn_collision_particles(&mut self) {
        let pos = self.position();
        let (Some(template), Some(spawner)) = (
            self.tuning.collision_particles.as_ref(),
            self.services.particles.as_mut(),
        ) else {
            return;
        };

        let handle = spawner.spawn_at(template, pos);
        let particle_pos = spawner.position(handle).unwrap_or(pos);
        let task = FollowTask::start(handle, particle_pos, pos);
        self.events.push(MissileEvent::ImpactParticles { handle, pos });

        // First step runs right away, the rest once per frame
        if task.tick(true, pos, spawner.as_mut()) {
            self.follow = Some(task);
        }
    }

    fn tick_follow(&mut self) {
        let Some(task) = self.follow else {
            return;
        };
        let parent_alive = self.is_alive();
        let pos = self.position();

        let keep = match self.services.particles.as_mut() {
            Some(spawner) => task.tick(parent_alive, pos, spawner.as_mut()),
            None => false,
        };
        if !keep {
            self.follow = None;
        }
    }

    fn destroy(&mut self, cause: DestroyCause) {
        if self.is_destroyed() {
            return;
        }
        self.stage = Stage::Destroyed(cause);
        self.follow = None;
        self.events.push(MissileEvent::Destroyed { cause });
        log::info!("Missile destroyed ({:?})", cause);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::audio::{AudioClip, SfxManager};
    use crate::sim::state::MissilePhase;
    use crate::sim::host::{Damage, KinematicBody, MissileServices, PlayerStats};
    use crate::sim::particles::{ParticleField, ParticleSpawner, ParticleTemplate};
    use crate::tuning::MissileTuning;

    const V0: Vec2 = Vec2::new(120.0, -40.0);

    struct Rig {
        body: Rc<RefCell<KinematicBody>>,
        field: Rc<RefCell<ParticleField>>,
        sfx: Rc<RefCell<SfxManager>>,
        damage: Rc<RefCell<Damage>>,
    }

    fn launch(tuning: MissileTuning) -> (MiningMissile, Rig) {
        let rig = Rig {
            body: Rc::new(RefCell::new(KinematicBody::new(Vec2::ZERO, V0))),
            field: Rc::new(RefCell::new(ParticleField::new())),
            sfx: Rc::new(RefCell::new(SfxManager::new())),
            damage: Rc::new(RefCell::new(Damage::default())),
        };
        let services = MissileServices::new()
            .with_body(Rc::clone(&rig.body))
            .with_particles(Rc::clone(&rig.field))
            .with_sfx(Rc::clone(&rig.sfx))
            .with_damage(Rc::clone(&rig.damage))
            .with_stats(PlayerStats { mining_skill: 7.0 });
        (MiningMissile::spawn(tuning, services, 12345), rig)
    }

    fn impact_tuning() -> MissileTuning {
        MissileTuning {
            standard_impact_clips: vec![
                AudioClip::new("impact_a"),
                AudioClip::new("impact_b"),
                AudioClip::new("impact_c"),
            ],
            collision_particles: Some(ParticleTemplate::new("debris", 2.0)),
            ..Default::default()
        }
    }

    fn assert_vec_close(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn test_spawn_slows_and_arms() {
        let (missile, rig) = launch(MissileTuning::default());
        assert_eq!(missile.phase(), MissilePhase::Flying { accelerated: false });
        assert_vec_close(rig.body.borrow().vel, V0 * 0.1);
        assert_eq!(rig.damage.borrow().amount, 7.0);
    }

    #[test]
    fn test_acceleration_restores_launch_speed() {
        let tuning = MissileTuning {
            acceleration_delay_secs: 0.5,
            start_speed_fraction: 0.1,
            ..Default::default()
        };
        let (mut missile, rig) = launch(tuning);

        for _ in 0..3 {
            missile.update(0.125);
        }
        assert!(!missile.has_accelerated());
        assert_vec_close(missile.velocity(), V0 * 0.1);

        missile.update(0.125);
        assert!(missile.has_accelerated());
        assert_eq!(missile.phase(), MissilePhase::Flying { accelerated: true });
        assert_vec_close(rig.body.borrow().vel, V0);
    }

    #[test]
    fn test_acceleration_fires_once() {
        let (mut missile, _rig) = launch(MissileTuning::default());
        let mut boosts = 0;
        for _ in 0..200 {
            missile.update(0.01);
            boosts += missile
                .drain_events()
                .iter()
                .filter(|e| **e == MissileEvent::Accelerated)
                .count();
        }
        assert_eq!(boosts, 1);
        assert_vec_close(missile.velocity(), V0);
    }

    #[test]
    fn test_zero_delay_boosts_on_first_frame() {
        let tuning = MissileTuning {
            acceleration_delay_secs: 0.0,
            ..Default::default()
        };
        let (mut missile, _rig) = launch(tuning);
        missile.update(0.016);
        assert!(missile.has_accelerated());
    }

    #[test]
    fn test_lifetime_expiry_is_terminal() {
        let tuning = MissileTuning {
            lifetime_secs: 1.0,
            ..Default::default()
        };
        let (mut missile, _rig) = launch(tuning);

        for _ in 0..3 {
            missile.update(0.25);
        }
        assert!(missile.is_alive());

        missile.update(0.25);
        assert_eq!(
            missile.phase(),
            MissilePhase::Destroyed {
                cause: DestroyCause::Expired
            }
        );
        let events = missile.drain_events();
        assert_eq!(
            events.last(),
            Some(&MissileEvent::Destroyed {
                cause: DestroyCause::Expired
            })
        );

        let remaining = missile.remaining_lifetime();
        missile.update(1.0);
        assert!(missile.drain_events().is_empty());
        assert_eq!(missile.remaining_lifetime(), remaining);
        assert!(!missile.on_trigger_enter(OBSTACLE_TAG));
    }

    #[test]
    fn test_no_smoke_without_template() {
        let (mut missile, rig) = launch(MissileTuning::default());
        for _ in 0..100 {
            missile.update(0.02);
        }
        assert_eq!(rig.field.borrow().spawned(), 0);
    }

    #[test]
    fn test_smoke_spawns_at_missile_position() {
        let tuning = MissileTuning {
            flight_particles: Some(ParticleTemplate::new("smoke", 0.5)),
            smoke_base_interval: 0.1,
            ..Default::default()
        };
        let (mut missile, rig) = launch(tuning);
        rig.body.borrow_mut().pos = Vec2::new(3.0, 4.0);

        for _ in 0..5 {
            missile.update(0.025);
        }
        let events = missile.drain_events();
        assert!(events.contains(&MissileEvent::SmokeSpawned {
            pos: Vec2::new(3.0, 4.0)
        }));
        let field = rig.field.borrow();
        assert_eq!(field.spawned(), 1);
        assert_eq!(field.particles()[0].template, "smoke");
    }

    #[test]
    fn test_obstacle_impact_sequence() {
        let (mut missile, rig) = launch(impact_tuning());
        missile.update(0.016);
        missile.drain_events();

        assert!(missile.on_trigger_enter(OBSTACLE_TAG));
        assert_eq!(missile.phase(), MissilePhase::Destroying);
        assert!(missile.is_alive());

        let events = missile.drain_events();
        let sounds = events
            .iter()
            .filter(|e| matches!(e, MissileEvent::ImpactSound { .. }))
            .count();
        let bursts = events
            .iter()
            .filter(|e| matches!(e, MissileEvent::ImpactParticles { .. }))
            .count();
        assert_eq!(sounds, 1);
        assert_eq!(bursts, 1);
        assert_eq!(rig.sfx.borrow().played().len(), 1);
        assert!(impact_tuning()
            .standard_impact_clips
            .contains(&rig.sfx.borrow().played()[0]));

        missile.update(0.016);
        assert_eq!(
            missile.phase(),
            MissilePhase::Destroyed {
                cause: DestroyCause::Impact
            }
        );
        assert_eq!(rig.field.borrow().spawned(), 1);
    }

    #[test]
    fn test_repeat_and_foreign_triggers_ignored() {
        let (mut missile, rig) = launch(impact_tuning());

        assert!(!missile.on_trigger_enter("Player"));
        assert!(!missile.on_trigger_enter("obstacle"));
        assert_eq!(missile.phase(), MissilePhase::Flying { accelerated: false });

        assert!(missile.on_trigger_enter(OBSTACLE_TAG));
        assert!(!missile.on_trigger_enter(OBSTACLE_TAG));
        assert_eq!(rig.sfx.borrow().played().len(), 1);
        assert_eq!(rig.field.borrow().spawned(), 1);
    }

    #[test]
    fn test_empty_clip_set_is_silent() {
        let tuning = MissileTuning {
            standard_impact_clips: Vec::new(),
            ..impact_tuning()
        };
        let (mut missile, rig) = launch(tuning);

        assert!(missile.on_trigger_enter(OBSTACLE_TAG));
        assert!(rig.sfx.borrow().played().is_empty());
        assert!(
            !missile
                .drain_events()
                .iter()
                .any(|e| matches!(e, MissileEvent::ImpactSound { .. }))
        );
    }

    #[test]
    fn test_asteroid_clips_never_played() {
        let tuning = MissileTuning {
            standard_impact_clips: Vec::new(),
            asteroid_impact_clips: vec![AudioClip::new("crunch")],
            ..Default::default()
        };
        let (mut missile, rig) = launch(tuning);
        missile.on_trigger_enter(OBSTACLE_TAG);
        missile.update(0.016);
        assert!(rig.sfx.borrow().played().is_empty());
    }

    #[test]
    fn test_missing_stats_leaves_damage_alone() {
        let damage = Rc::new(RefCell::new(Damage { amount: 3.0 }));
        let services = MissileServices::new()
            .with_body(KinematicBody::new(Vec2::ZERO, V0))
            .with_damage(Rc::clone(&damage));
        let mut missile = MiningMissile::spawn(impact_tuning(), services, 9);
        assert_eq!(damage.borrow().amount, 3.0);
        assert_vec_close(missile.velocity(), V0 * 0.1);

        assert!(missile.on_trigger_enter(OBSTACLE_TAG));
        missile.update(0.0);
        assert!(missile.is_destroyed());
        assert_eq!(damage.borrow().amount, 3.0);
    }

    #[test]
    fn test_missing_damage_carrier_is_skipped() {
        let services = MissileServices::new()
            .with_body(KinematicBody::new(Vec2::ZERO, V0))
            .with_stats(PlayerStats { mining_skill: 5.0 });
        let mut missile = MiningMissile::spawn(MissileTuning::default(), services, 9);
        missile.update(0.6);
        assert!(missile.has_accelerated());
        assert_vec_close(missile.velocity(), V0);
    }

    #[test]
    fn test_missing_body_still_counts_down_boost() {
        let damage = Rc::new(RefCell::new(Damage::default()));
        let services = MissileServices::new()
            .with_damage(Rc::clone(&damage))
            .with_stats(PlayerStats { mining_skill: 2.0 });
        let mut missile = MiningMissile::spawn(MissileTuning::default(), services, 9);
        assert_eq!(damage.borrow().amount, 2.0);

        missile.update(0.6);
        assert!(missile.has_accelerated());
        assert_eq!(missile.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_boost_flag_survives_impact() {
        let (mut missile, _rig) = launch(impact_tuning());
        missile.update(0.6);
        assert_eq!(missile.phase(), MissilePhase::Flying { accelerated: true });

        missile.on_trigger_enter(OBSTACLE_TAG);
        assert_eq!(missile.phase(), MissilePhase::Destroying);
        missile.update(0.016);
        assert!(missile.has_accelerated());
        assert_eq!(
            missile.phase(),
            MissilePhase::Destroyed {
                cause: DestroyCause::Impact
            }
        );
    }

    #[test]
    fn test_runs_without_any_services() {
        let tuning = MissileTuning {
            flight_particles: Some(ParticleTemplate::new("smoke", 0.5)),
            ..impact_tuning()
        };
        let mut missile = MiningMissile::spawn(tuning, MissileServices::new(), 1);
        for _ in 0..30 {
            missile.update(0.05);
        }
        assert_eq!(missile.position(), Vec2::ZERO);
        assert!(missile.on_trigger_enter(OBSTACLE_TAG));
        assert!(!missile.is_following());
        missile.update(0.05);
        assert!(missile.is_destroyed());
    }

    #[test]
    fn test_collision_effect_follows_until_destroyed() {
        let (mut missile, rig) = launch(impact_tuning());
        rig.body.borrow_mut().pos = Vec2::new(10.0, 0.0);

        missile.on_trigger_enter(OBSTACLE_TAG);
        assert!(missile.is_following());
        let handle = rig.field.borrow().particles()[0].handle;
        assert_eq!(rig.field.borrow().position(handle), Some(Vec2::new(10.0, 0.0)));

        // Body keeps moving during the last frame
        rig.body.borrow_mut().pos = Vec2::new(12.0, 1.0);
        missile.update(0.016);
        assert!(missile.is_destroyed());
        assert!(!missile.is_following());
        assert_eq!(rig.field.borrow().position(handle), Some(Vec2::new(12.0, 1.0)));

        // Missile gone: the effect stays where it was left
        rig.body.borrow_mut().pos = Vec2::new(50.0, 50.0);
        missile.update(0.016);
        assert_eq!(rig.field.borrow().position(handle), Some(Vec2::new(12.0, 1.0)));
    }

    #[test]
    fn test_follow_drops_expired_effect() {
        let tuning = MissileTuning {
            collision_particles: Some(ParticleTemplate::new("flash", 0.01)),
            ..impact_tuning()
        };
        let (mut missile, rig) = launch(tuning);
        missile.on_trigger_enter(OBSTACLE_TAG);
        rig.field.borrow_mut().step(0.1);
        missile.update(0.016);
        assert!(!missile.is_following());
        assert!(missile.is_destroyed());
    }

    #[test]
    fn test_impact_before_boost_skips_boost() {
        let (mut missile, rig) = launch(impact_tuning());
        missile.on_trigger_enter(OBSTACLE_TAG);
        missile.update(1.0);
        assert!(!missile.has_accelerated());
        assert_vec_close(rig.body.borrow().vel, V0 * 0.1);
    }
}
