//! Host capabilities the missile drives
//!
//! The missile never owns a physics world, a stats system or a mixer. It is
//! handed optional handles to them once at spawn; any that are missing make
//! the matching effect a no-op.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use super::particles::{ParticleHandle, ParticleSpawner, ParticleTemplate};
use crate::audio::{AudioClip, SfxPlayer};

/// The missile's rigid body
pub trait PhysicsBody {
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, vel: Vec2);
    fn position(&self) -> Vec2;
}

/// Receives the damage value this missile deals
pub trait DamageCarrier {
    fn change_damage(&mut self, amount: f32);
}

/// Read-only player stats
pub trait StatsProvider {
    fn mining_skill(&self) -> f32;
}

/// Services looked up once when a missile spawns
#[derive(Default)]
pub struct MissileServices {
    pub sfx: Option<Box<dyn SfxPlayer>>,
    pub stats: Option<Box<dyn StatsProvider>>,
    pub body: Option<Box<dyn PhysicsBody>>,
    pub damage: Option<Box<dyn DamageCarrier>>,
    pub particles: Option<Box<dyn ParticleSpawner>>,
}

impl MissileServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sfx(mut self, sfx: impl SfxPlayer + 'static) -> Self {
        self.sfx = Some(Box::new(sfx));
        self
    }

    pub fn with_stats(mut self, stats: impl StatsProvider + 'static) -> Self {
        self.stats = Some(Box::new(stats));
        self
    }

    pub fn with_body(mut self, body: impl PhysicsBody + 'static) -> Self {
        self.body = Some(Box::new(body));
        self
    }

    pub fn with_damage(mut self, damage: impl DamageCarrier + 'static) -> Self {
        self.damage = Some(Box::new(damage));
        self
    }

    pub fn with_particles(mut self, particles: impl ParticleSpawner + 'static) -> Self {
        self.particles = Some(Box::new(particles));
        self
    }
}

// Shared handles: the host keeps one clone to drive its own loop, the
// missile gets the other.

impl<T: PhysicsBody> PhysicsBody for Rc<RefCell<T>> {
    fn velocity(&self) -> Vec2 {
        self.borrow().velocity()
    }

    fn set_velocity(&mut self, vel: Vec2) {
        self.borrow_mut().set_velocity(vel);
    }

    fn position(&self) -> Vec2 {
        self.borrow().position()
    }
}

impl<T: DamageCarrier> DamageCarrier for Rc<RefCell<T>> {
    fn change_damage(&mut self, amount: f32) {
        self.borrow_mut().change_damage(amount);
    }
}

impl<T: StatsProvider> StatsProvider for Rc<RefCell<T>> {
    fn mining_skill(&self) -> f32 {
        self.borrow().mining_skill()
    }
}

impl<T: SfxPlayer> SfxPlayer for Rc<RefCell<T>> {
    fn play_sfx(&mut self, clip: &AudioClip) {
        self.borrow_mut().play_sfx(clip);
    }
}

impl<T: ParticleSpawner> ParticleSpawner for Rc<RefCell<T>> {
    fn spawn_at(&mut self, template: &ParticleTemplate, pos: Vec2) -> ParticleHandle {
        self.borrow_mut().spawn_at(template, pos)
    }

    fn position(&self, handle: ParticleHandle) -> Option<Vec2> {
        self.borrow().position(handle)
    }

    fn set_position(&mut self, handle: ParticleHandle, pos: Vec2) -> bool {
        self.borrow_mut().set_position(handle, pos)
    }

    fn is_alive(&self, handle: ParticleHandle) -> bool {
        self.borrow().is_alive(handle)
    }
}

/// Body that moves in a straight line at its velocity
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KinematicBody {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl KinematicBody {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Integrate position over one step
    pub fn step(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

impl PhysicsBody for KinematicBody {
    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    fn position(&self) -> Vec2 {
        self.pos
    }
}

/// Damage value holder
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Damage {
    pub amount: f32,
}

impl DamageCarrier for Damage {
    fn change_damage(&mut self, amount: f32) {
        self.amount = amount;
    }
}

/// Player stats snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerStats {
    pub mining_skill: f32,
}

impl StatsProvider for PlayerStats {
    fn mining_skill(&self) -> f32 {
        self.mining_skill
    }
}
