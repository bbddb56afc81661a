//! Combat domain: tests for hit filtering, damage math, the combo machine
//! and the timer wheel.

use avian2d::prelude::{CollisionStart, LinearVelocity, RigidBody};
use bevy::ecs::message::{Message, Messages};
use bevy::prelude::{
    App, ChildOf, Entity, GlobalTransform, IntoScheduleConfigs, MinimalPlugins, Update, Vec2,
    World,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::damage::resolve_hits;
use super::health::apply_damage;
use super::hit_detection::detect_hits;
use super::schedule::TICKS_PER_SECOND;
use super::*;
use crate::blood::{BloodMeter, BloodPickup};
use crate::content::{ArenaDef, AttackDef, ComboDef, CombatDefaults};

const TICK: f32 = 1.0 / TICKS_PER_SECOND;

fn entities(count: usize) -> Vec<Entity> {
    let mut world = World::new();
    (0..count).map(|_| world.spawn_empty().id()).collect()
}

fn entity() -> Entity {
    entities(1)[0]
}

fn combo_def(min: u32, max: u32) -> ComboDef {
    ComboDef {
        min_combo_attacks: min,
        max_combo_attacks: max,
        windup: 0.1,
        attack_duration: 0.2,
        inter_attack_delay: 0.1,
        combo_cooldown: 0.5,
        stall_grace: 0.5,
        stun_cooldown: 1.0,
        allow_stun_during_attack: false,
    }
}

fn profile() -> AttackProfile {
    AttackProfile::from(&AttackDef {
        base_damage: 10.0,
        base_force: 400.0,
        heavy_damage_multiplier: 2.0,
        heavy_force_multiplier: 1.5,
        light_stun: 0.3,
        heavy_stun: 0.6,
    })
}

/// Step the wheel tick by tick over `(from, until]`, feeding every due
/// timer to the machine. Checks the step counter at every observation.
fn run_timers(
    machine: &mut ComboMachine,
    owner: Entity,
    wheel: &mut TimerWheel,
    from: f32,
    until: f32,
) -> Vec<ComboTransition> {
    let mut transitions = Vec::new();
    let first = (from * TICKS_PER_SECOND).round() as u64 + 1;
    let last = (until * TICKS_PER_SECOND).round() as u64;

    for tick in first..=last {
        let now = tick as f32 * TICK;
        for key in wheel.drain_due(now) {
            assert_eq!(key.owner, owner);
            if let Some(transition) = machine.on_timer(owner, key.purpose, now, wheel) {
                transitions.push(transition);
            }
            assert!(machine.current_step() <= machine.target_length());
        }
    }
    transitions
}

// -----------------------------------------------------------------------------
// Hit detection
// -----------------------------------------------------------------------------

#[test]
fn test_hit_set_rejects_owner() {
    let ids = entities(2);
    let mut set = HitSet::default();

    assert_eq!(set.register(ids[0], ids[0]), HitVerdict::RejectSelf);
    assert!(set.is_empty());
}

#[test]
fn test_hit_set_rejects_duplicates() {
    let ids = entities(2);
    let (owner, target) = (ids[0], ids[1]);
    let mut set = HitSet::default();

    assert_eq!(set.register(target, owner), HitVerdict::Accept);
    assert_eq!(set.register(target, owner), HitVerdict::RejectDuplicate);
    assert_eq!(set.len(), 1);
}

#[test]
fn test_hit_set_never_holds_a_target_twice() {
    let ids = entities(6);
    let owner = ids[0];
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut set = HitSet::default();

    for _ in 0..500 {
        let target = ids[rng.random_range(0..ids.len())];
        let before = set.len();
        let verdict = set.register(target, owner);
        match verdict {
            HitVerdict::Accept => assert_eq!(set.len(), before + 1),
            _ => assert_eq!(set.len(), before),
        }
    }

    assert_eq!(set.len(), ids.len() - 1);
    assert!(!set.contains(owner));
}

#[test]
fn test_hit_set_is_order_independent() {
    let ids = entities(4);
    let owner = ids[0];
    let mut forward = HitSet::default();
    let mut backward = HitSet::default();

    for target in ids.iter() {
        forward.register(*target, owner);
    }
    for target in ids.iter().rev() {
        backward.register(*target, owner);
    }

    assert_eq!(forward.len(), backward.len());
    for target in &ids[1..] {
        assert!(forward.contains(*target));
        assert!(backward.contains(*target));
    }
}

#[test]
fn test_closed_hitbox_ignores_overlaps() {
    let ids = entities(2);
    let mut hitbox = AttackHitbox::new(ids[0]);

    assert_eq!(hitbox.register(ids[1]), None);
    assert!(hitbox.hit_set().is_empty());
}

#[test]
fn test_hitbox_clears_hit_set_on_open_and_close() {
    let ids = entities(2);
    let (owner, target) = (ids[0], ids[1]);
    let mut hitbox = AttackHitbox::new(owner);

    hitbox.open(AttackStrength::Light);
    assert_eq!(hitbox.register(target), Some(HitVerdict::Accept));
    assert_eq!(hitbox.register(target), Some(HitVerdict::RejectDuplicate));

    hitbox.open(AttackStrength::Heavy);
    assert!(hitbox.hit_set().is_empty());
    assert_eq!(hitbox.strength(), AttackStrength::Heavy);
    assert_eq!(hitbox.register(target), Some(HitVerdict::Accept));

    hitbox.close();
    assert!(!hitbox.is_open());
    assert!(hitbox.hit_set().is_empty());
}

// -----------------------------------------------------------------------------
// Damage resolution
// -----------------------------------------------------------------------------

#[test]
fn test_light_and_heavy_damage() {
    let profile = profile();

    assert_eq!(resolve_hit(&profile, AttackStrength::Light, 1.0).damage, 10.0);
    assert_eq!(resolve_hit(&profile, AttackStrength::Heavy, 1.0).damage, 20.0);
}

#[test]
fn test_blood_modifier_scales_damage_not_force() {
    let profile = profile();
    let base = resolve_hit(&profile, AttackStrength::Light, 1.0);
    let boosted = resolve_hit(&profile, AttackStrength::Light, 1.5);

    assert_eq!(boosted.damage, 15.0);
    assert_eq!(boosted.force, base.force);
}

#[test]
fn test_force_and_stun_per_tier() {
    let profile = profile();
    let light = resolve_hit(&profile, AttackStrength::Light, 1.0);
    let heavy = resolve_hit(&profile, AttackStrength::Heavy, 1.0);

    assert_eq!(light.force, 400.0);
    assert_eq!(heavy.force, 600.0);
    assert_eq!(light.stun, 0.3);
    assert_eq!(heavy.stun, 0.6);
}

#[test]
fn test_knockback_direction_points_away_from_origin() {
    let dir = knockback_direction(Vec2::ZERO, Vec2::new(3.0, 4.0));
    assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-6);

    assert_eq!(knockback_direction(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
}

// -----------------------------------------------------------------------------
// Health sink
// -----------------------------------------------------------------------------

#[test]
fn test_overkill_clamps_and_kills_once() {
    let mut health = Health::new(15.0);

    assert_eq!(
        health.take_damage(20.0),
        DamageOutcome::Killed { applied: 15.0 }
    );
    assert_eq!(health.current(), 0.0);
    assert!(health.is_dead());

    assert_eq!(health.take_damage(5.0), DamageOutcome::Ignored);
    assert_eq!(health.current(), 0.0);
}

#[test]
fn test_dead_entities_ignore_heal() {
    let mut health = Health::new(10.0);
    health.take_damage(10.0);

    assert_eq!(health.heal(5.0), 0.0);
    assert_eq!(health.current(), 0.0);
}

#[test]
fn test_heal_clamps_at_max() {
    let mut health = Health::new(50.0);
    health.take_damage(10.0);

    assert_eq!(health.heal(25.0), 10.0);
    assert_eq!(health.current(), 50.0);
}

#[test]
fn test_health_never_negative_and_death_reported_once() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    for _ in 0..100 {
        let mut health = Health::new(rng.random_range(1.0..100.0));
        let mut kills = 0;
        for _ in 0..20 {
            let previous = health.current();
            let amount = rng.random_range(0.0..30.0);
            let outcome = health.take_damage(amount);
            assert!(health.current() >= 0.0);
            if previous > 0.0 {
                assert_eq!(health.current(), (previous - amount).max(0.0));
            }
            if let DamageOutcome::Killed { .. } = outcome {
                kills += 1;
            }
        }
        assert!(kills <= 1);
    }
}

#[test]
fn test_drop_ranges_respect_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let table = DropTable {
        light: DropRange::new(0, 1),
        heavy: DropRange::new(2, 4),
    };

    for _ in 0..200 {
        assert!(table.roll(AttackStrength::Light, &mut rng) <= 1);
        let heavy = table.roll(AttackStrength::Heavy, &mut rng);
        assert!((2..=4).contains(&heavy));
    }
    assert_eq!(DropRange::fixed(3).roll(&mut rng), 3);
}

#[test]
fn test_damage_reaction_rules() {
    let mut reaction = DamageReaction::new(0.4, 0.5);

    assert!(!reaction.try_trigger(0.0, AttackStrength::Light, false));
    assert!(reaction.try_trigger(0.0, AttackStrength::Heavy, false));
    // Cooldown blocks even heavy hits
    assert!(!reaction.try_trigger(0.2, AttackStrength::Heavy, true));
    assert!(reaction.try_trigger(0.4, AttackStrength::Light, true));
}

// -----------------------------------------------------------------------------
// Combo machine
// -----------------------------------------------------------------------------

#[test]
fn test_combo_runs_through_phases() {
    let owner = entity();
    let mut wheel = TimerWheel::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut machine = ComboMachine::new(combo_def(2, 2));

    assert!(machine.start_combo(owner, 0.0, &mut rng, &mut wheel, AttackStrength::Light));
    assert_eq!(machine.phase(), ComboPhase::WindingUp);
    assert_eq!(machine.current_step(), 1);
    assert!(!machine.can_attack(0.0));

    let transitions = run_timers(&mut machine, owner, &mut wheel, 0.0, 1.0);
    assert_eq!(
        transitions,
        vec![
            ComboTransition::HitboxOpened {
                step: 1,
                strength: AttackStrength::Light
            },
            ComboTransition::HitboxClosed {
                combo_finished: false
            },
            ComboTransition::StepStarted { step: 2 },
            ComboTransition::HitboxOpened {
                step: 2,
                strength: AttackStrength::Light
            },
            ComboTransition::HitboxClosed {
                combo_finished: true
            },
        ]
    );
    assert_eq!(machine.phase(), ComboPhase::Idle);
    assert_eq!(machine.current_step(), 2);
    assert!(wheel.is_empty());
}

#[test]
fn test_combo_cooldown_gates_next_attack() {
    let owner = entity();
    let mut wheel = TimerWheel::default();
    let mut machine = ComboMachine::new(combo_def(1, 1));

    assert!(machine.start_strike(owner, 0.0, &mut wheel, AttackStrength::Heavy));
    run_timers(&mut machine, owner, &mut wheel, 0.0, 0.3);
    assert_eq!(machine.phase(), ComboPhase::Idle);

    // Closed at 0.3, cooldown 0.5
    assert!(!machine.can_attack(0.5));
    assert!(!machine.start_strike(owner, 0.5, &mut wheel, AttackStrength::Light));
    assert!(machine.can_attack(0.81));
}

#[test]
fn test_combo_lengths_stay_in_range() {
    let owner = entity();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut seen = [false; 2];

    for _ in 0..1000 {
        let mut wheel = TimerWheel::default();
        let mut machine = ComboMachine::new(combo_def(2, 3));
        assert!(machine.start_combo(owner, 0.0, &mut rng, &mut wheel, AttackStrength::Light));

        let length = machine.target_length();
        assert!(length == 2 || length == 3);
        seen[(length - 2) as usize] = true;

        run_timers(&mut machine, owner, &mut wheel, 0.0, 2.0);
        assert_eq!(machine.phase(), ComboPhase::Idle);
        assert_eq!(machine.current_step(), length);
        assert_eq!(machine.target_length(), length);
    }

    assert!(seen[0] && seen[1]);
}

#[test]
fn test_combo_length_is_fixed_for_the_whole_combo() {
    let owner = entity();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut wheel = TimerWheel::default();
    let mut machine = ComboMachine::new(combo_def(1, 5));

    machine.start_combo(owner, 0.0, &mut rng, &mut wheel, AttackStrength::Light);
    let length = machine.target_length();

    let mut now = 0.0;
    while machine.is_attacking() {
        run_timers(&mut machine, owner, &mut wheel, now, now + 0.05);
        now += 0.05;
        assert_eq!(machine.target_length(), length);
    }
}

#[test]
fn test_second_stun_during_stun_is_rejected() {
    let owner = entity();
    let mut wheel = TimerWheel::default();
    let mut machine = ComboMachine::new(combo_def(1, 1));

    assert!(machine.apply_hitstun(owner, 0.0, 0.5, &mut wheel).is_accepted());
    assert_eq!(
        machine.apply_hitstun(owner, 0.2, 0.5, &mut wheel),
        StunVerdict::AlreadyStunned
    );
    assert_eq!(wheel.due_at(owner, TimerPurpose::StunRecovered), Some(0.5));

    run_timers(&mut machine, owner, &mut wheel, 0.0, 0.49);
    assert!(machine.is_stunned());

    let transitions = run_timers(&mut machine, owner, &mut wheel, 0.49, 0.5);
    assert_eq!(transitions, vec![ComboTransition::StunRecovered]);
    assert_eq!(machine.phase(), ComboPhase::Idle);
}

#[test]
fn test_stun_cooldown_counts_from_acceptance() {
    let owner = entity();
    let mut wheel = TimerWheel::default();
    let mut machine = ComboMachine::new(combo_def(1, 1));

    assert!(machine.apply_hitstun(owner, 0.0, 0.1, &mut wheel).is_accepted());
    run_timers(&mut machine, owner, &mut wheel, 0.0, 0.1);
    assert!(!machine.is_stunned());

    assert_eq!(
        machine.apply_hitstun(owner, 0.5, 0.1, &mut wheel),
        StunVerdict::CoolingDown
    );
    assert!(machine.apply_hitstun(owner, 1.0, 0.1, &mut wheel).is_accepted());
    assert_eq!(machine.last_stun_at(), Some(1.0));
}

#[test]
fn test_accepted_stuns_are_never_closer_than_cooldown() {
    let owner = entity();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut wheel = TimerWheel::default();
    let mut machine = ComboMachine::new(combo_def(1, 1));
    let mut accepted: Vec<f32> = Vec::new();
    let mut now = 0.0;

    for _ in 0..300 {
        let next = now + rng.random_range(0.0..0.4);
        run_timers(&mut machine, owner, &mut wheel, now, next);
        now = next;
        if machine.apply_hitstun(owner, now, 0.2, &mut wheel).is_accepted() {
            accepted.push(now);
        }
    }

    assert!(accepted.len() > 1);
    for pair in accepted.windows(2) {
        assert!(pair[1] - pair[0] >= machine.tuning().stun_cooldown);
    }
}

#[test]
fn test_stun_rejected_while_attacking_when_disallowed() {
    let owner = entity();
    let mut wheel = TimerWheel::default();
    let mut machine = ComboMachine::new(combo_def(1, 1));

    machine.start_strike(owner, 0.0, &mut wheel, AttackStrength::Light);
    assert_eq!(
        machine.apply_hitstun(owner, 0.05, 0.3, &mut wheel),
        StunVerdict::Attacking
    );
    assert!(wheel.is_pending(owner, TimerPurpose::WindupElapsed));
}

#[test]
fn test_stun_interrupts_attack_when_allowed() {
    let owner = entity();
    let mut wheel = TimerWheel::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut def = combo_def(3, 3);
    def.allow_stun_during_attack = true;
    let mut machine = ComboMachine::new(def);

    machine.start_combo(owner, 0.0, &mut rng, &mut wheel, AttackStrength::Light);
    run_timers(&mut machine, owner, &mut wheel, 0.0, 0.15);
    assert!(machine.is_hitbox_open());

    let verdict = machine.apply_hitstun(owner, 0.15, 0.3, &mut wheel);
    assert_eq!(
        verdict,
        StunVerdict::Accepted {
            hitbox_was_open: true
        }
    );
    for purpose in TimerPurpose::ATTACK {
        assert!(!wheel.is_pending(owner, purpose));
    }
    assert_eq!(machine.target_length(), machine.current_step());

    run_timers(&mut machine, owner, &mut wheel, 0.15, 1.0);
    assert_eq!(machine.phase(), ComboPhase::Idle);
    assert_eq!(machine.current_step(), 1);
}

#[test]
fn test_stale_timer_is_ignored() {
    let owner = entity();
    let mut wheel = TimerWheel::default();
    let mut machine = ComboMachine::new(combo_def(1, 1));

    assert_eq!(
        machine.on_timer(owner, TimerPurpose::ActiveElapsed, 0.0, &mut wheel),
        None
    );
    assert_eq!(machine.phase(), ComboPhase::Idle);
}

#[test]
fn test_stall_watchdog_resets_stuck_hit_window() {
    let owner = entity();
    let mut wheel = TimerWheel::default();
    let mut machine = ComboMachine::new(combo_def(1, 1));

    machine.start_strike(owner, 0.0, &mut wheel, AttackStrength::Light);
    run_timers(&mut machine, owner, &mut wheel, 0.0, 0.1);
    assert!(machine.is_hitbox_open());

    // Lose the closing timer
    assert!(wheel.cancel(owner, TimerPurpose::ActiveElapsed));

    assert!(!machine.check_stall(owner, 0.75, &mut wheel));
    assert!(machine.check_stall(owner, 0.85, &mut wheel));
    assert_eq!(machine.phase(), ComboPhase::Idle);
    assert!(!machine.is_attacking());
}

#[test]
fn test_disabled_machine_ignores_everything() {
    let owner = entity();
    let mut wheel = TimerWheel::default();
    let mut machine = ComboMachine::new(combo_def(1, 1));

    machine.disable_for_ragdoll();

    assert!(!machine.can_attack(10.0));
    assert!(!machine.start_strike(owner, 10.0, &mut wheel, AttackStrength::Light));
    assert_eq!(
        machine.apply_hitstun(owner, 10.0, 0.3, &mut wheel),
        StunVerdict::Disabled
    );
}

// -----------------------------------------------------------------------------
// Ragdoll capability and AI
// -----------------------------------------------------------------------------

#[test]
fn test_nav_agent_stops_for_ragdoll() {
    let mut nav = NavAgent::new(120.0);
    nav.steer_toward(Vec2::new(0.0, 2.0));
    assert_eq!(nav.velocity, Vec2::new(0.0, 120.0));

    nav.disable_for_ragdoll();
    assert!(!nav.enabled);
    assert_eq!(nav.velocity, Vec2::ZERO);
}

#[test]
fn test_enemy_ai_decisions() {
    let owner = entity();
    let mut wheel = TimerWheel::default();
    let ai = EnemyAi::from_arena(&ArenaDef::default());
    let mut machine = ComboMachine::new(combo_def(1, 1));

    assert_eq!(ai.decide(None, &machine), AiState::Idle);
    assert_eq!(ai.decide(Some(ai.aggro_range + 1.0), &machine), AiState::Idle);
    assert_eq!(ai.decide(Some(ai.aggro_range - 1.0), &machine), AiState::Chase);
    assert_eq!(ai.decide(Some(ai.attack_range), &machine), AiState::Attack);

    machine.start_strike(owner, 0.0, &mut wheel, AttackStrength::Light);
    assert_eq!(ai.decide(Some(1000.0), &machine), AiState::Attack);

    let mut stunned = ComboMachine::new(combo_def(1, 1));
    stunned.apply_hitstun(owner, 0.0, 0.5, &mut wheel);
    assert_eq!(ai.decide(Some(1.0), &stunned), AiState::Stunned);
}

#[test]
fn test_facing_keeps_direction_on_zero_input() {
    let mut facing = Facing::default();
    facing.turn_toward(Vec2::new(0.0, -5.0));
    assert_eq!(facing.0, Vec2::NEG_Y);

    facing.turn_toward(Vec2::ZERO);
    assert_eq!(facing.0, Vec2::NEG_Y);
}

// -----------------------------------------------------------------------------
// Timer wheel
// -----------------------------------------------------------------------------

#[test]
fn test_timer_wheel_orders_by_due_then_insertion() {
    let ids = entities(3);
    let mut wheel = TimerWheel::default();

    wheel.schedule(ids[0], TimerPurpose::StunRecovered, 0.5);
    wheel.schedule(ids[1], TimerPurpose::WindupElapsed, 0.2);
    wheel.schedule(ids[2], TimerPurpose::WindupElapsed, 0.2);

    let due = wheel.drain_due(1.0);
    let owners: Vec<Entity> = due.iter().map(|key| key.owner).collect();
    assert_eq!(owners, vec![ids[1], ids[2], ids[0]]);
    assert!(wheel.is_empty());
}

#[test]
fn test_timer_wheel_reschedule_replaces() {
    let owner = entity();
    let mut wheel = TimerWheel::default();

    wheel.schedule(owner, TimerPurpose::NextStep, 0.2);
    wheel.schedule(owner, TimerPurpose::NextStep, 0.6);

    assert_eq!(wheel.len(), 1);
    assert!(wheel.drain_due(0.5).is_empty());
    assert_eq!(wheel.drain_due(0.6).len(), 1);
}

#[test]
fn test_timer_wheel_cancel_owner() {
    let ids = entities(2);
    let mut wheel = TimerWheel::default();

    for purpose in TimerPurpose::COMBO {
        wheel.schedule(ids[0], purpose, 1.0);
    }
    wheel.schedule(ids[1], TimerPurpose::Despawn, 1.0);

    assert_eq!(wheel.cancel_owner(ids[0]), TimerPurpose::COMBO.len());
    assert!(!wheel.cancel(ids[0], TimerPurpose::NextStep));
    assert_eq!(wheel.len(), 1);
    assert!(wheel.is_pending(ids[1], TimerPurpose::Despawn));
}

#[test]
fn test_timer_wheel_leaves_future_timers() {
    let owner = entity();
    let mut wheel = TimerWheel::default();

    wheel.schedule(owner, TimerPurpose::Despawn, 2.5);
    assert!(wheel.drain_due(2.49).is_empty());
    assert_eq!(wheel.due_at(owner, TimerPurpose::Despawn), Some(2.5));
    assert_eq!(wheel.drain_due(2.5).len(), 1);
}

#[test]
fn test_timer_wheel_never_fires_early() {
    let owner = entity();
    let mut wheel = TimerWheel::default();

    wheel.schedule(owner, TimerPurpose::StunRecovered, 0.504);
    assert!(wheel.drain_due(0.5).is_empty());
    assert!(wheel.drain_due(0.503).is_empty());
    assert_eq!(wheel.drain_due(0.51).len(), 1);
}

#[test]
fn test_confine_to_arena_clamps_and_stops_outward_motion() {
    let bounds = Vec2::new(100.0, 50.0);

    let (position, velocity) = confine_to_arena(Vec2::new(20.0, 10.0), Vec2::new(5.0, -5.0), bounds);
    assert_eq!(position, Vec2::new(20.0, 10.0));
    assert_eq!(velocity, Vec2::new(5.0, -5.0));

    let (position, velocity) =
        confine_to_arena(Vec2::new(130.0, -50.0), Vec2::new(40.0, -10.0), bounds);
    assert_eq!(position, Vec2::new(100.0, -50.0));
    assert_eq!(velocity, Vec2::ZERO);

    // Moving back inward is allowed at the edge
    let (_, velocity) = confine_to_arena(Vec2::new(100.0, 0.0), Vec2::new(-40.0, 0.0), bounds);
    assert_eq!(velocity, Vec2::new(-40.0, 0.0));
}

// -----------------------------------------------------------------------------
// Systems: detect -> resolve -> apply
// -----------------------------------------------------------------------------

fn combat_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .init_resource::<CombatDefaults>()
        .init_resource::<TimerWheel>()
        .insert_resource(GameRng::from_seed(7))
        .add_message::<CollisionStart>()
        .add_message::<HitEvent>()
        .add_message::<DamageEvent>()
        .add_message::<DeathEvent>()
        .add_message::<StunAppliedEvent>()
        .add_message::<ReactionTriggeredEvent>()
        .add_systems(Update, (detect_hits, resolve_hits, apply_damage).chain());
    app
}

/// Every message of type `M` still buffered in the app
fn written<M: Message + Clone>(app: &App) -> Vec<M> {
    let messages = app.world().resource::<Messages<M>>();
    messages.get_cursor().read(messages).cloned().collect()
}

fn at(x: f32, y: f32) -> GlobalTransform {
    GlobalTransform::from_xyz(x, y, 0.0)
}

fn spawn_attacker(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((Combatant, profile(), at(0.0, 0.0)))
        .id()
}

fn hit(app: &mut App, attacker: Entity, target: Entity, strength: AttackStrength) {
    app.world_mut().write_message(HitEvent {
        attacker,
        target,
        hitbox: attacker,
        strength,
    });
}

fn pickup_count(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&BloodPickup>().iter(world).count()
}

#[test]
fn test_detect_hits_filters_own_hierarchy_and_duplicates() {
    let mut app = combat_app();
    let world = app.world_mut();

    let owner = world.spawn((Combatant, at(0.0, 0.0))).id();
    let mut hitbox = AttackHitbox::new(owner);
    hitbox.open(AttackStrength::Heavy);
    let hitbox = world.spawn((hitbox, ChildOf(owner))).id();
    let own_limb = world.spawn(ChildOf(owner)).id();

    let target = world.spawn((Combatant, at(30.0, 0.0))).id();
    let target_limb = world.spawn(ChildOf(target)).id();
    let wall = world.spawn(at(60.0, 0.0)).id();

    let overlaps = [
        (hitbox, own_limb, Some(owner), None),
        (hitbox, target_limb, Some(owner), None),
        (target, hitbox, Some(target), Some(owner)),
        (hitbox, wall, Some(owner), Some(wall)),
    ];
    for (collider1, collider2, body1, body2) in overlaps {
        world.write_message(CollisionStart {
            collider1,
            collider2,
            body1,
            body2,
        });
    }
    app.update();

    let hits = written::<HitEvent>(&app);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].attacker, owner);
    assert_eq!(hits[0].target, target);
    assert_eq!(hits[0].strength, AttackStrength::Heavy);
}

#[test]
fn test_closed_hitbox_reports_nothing() {
    let mut app = combat_app();
    let world = app.world_mut();

    let owner = world.spawn(Combatant).id();
    let hitbox = world.spawn((AttackHitbox::new(owner), ChildOf(owner))).id();
    let target = world.spawn(Combatant).id();
    world.write_message(CollisionStart {
        collider1: hitbox,
        collider2: target,
        body1: Some(owner),
        body2: Some(target),
    });
    app.update();

    assert!(written::<HitEvent>(&app).is_empty());
}

#[test]
fn test_nav_agent_target_skips_knockback_and_turns_kinematic() {
    let mut app = combat_app();
    let attacker = spawn_attacker(&mut app);
    let target = app
        .world_mut()
        .spawn((
            Health::new(100.0),
            NavAgent::new(120.0),
            RigidBody::Dynamic,
            LinearVelocity::default(),
            at(10.0, 0.0),
        ))
        .id();

    hit(&mut app, attacker, target, AttackStrength::Light);
    app.update();

    let world = app.world();
    assert_eq!(*world.get::<RigidBody>(target).unwrap(), RigidBody::Kinematic);
    assert_eq!(world.get::<LinearVelocity>(target).unwrap().0, Vec2::ZERO);
    assert_eq!(world.get::<Health>(target).unwrap().current(), 90.0);
}

#[test]
fn test_free_body_is_knocked_away_from_attacker() {
    let mut app = combat_app();
    let attacker = spawn_attacker(&mut app);
    let target = app
        .world_mut()
        .spawn((
            Health::new(100.0),
            RigidBody::Dynamic,
            LinearVelocity::default(),
            at(10.0, 0.0),
        ))
        .id();

    hit(&mut app, attacker, target, AttackStrength::Heavy);
    app.update();

    let velocity = app.world().get::<LinearVelocity>(target).unwrap().0;
    assert_eq!(velocity, Vec2::new(600.0, 0.0));
    assert_eq!(app.world().get::<Health>(target).unwrap().current(), 80.0);
}

#[test]
fn test_hit_on_ragdoll_leaves_body_dynamic() {
    let mut app = combat_app();
    let attacker = spawn_attacker(&mut app);

    let mut health = Health::new(10.0);
    health.take_damage(10.0);
    let mut nav = NavAgent::new(120.0);
    nav.disable_for_ragdoll();
    let corpse = app
        .world_mut()
        .spawn((
            health,
            nav,
            Ragdoll,
            RigidBody::Dynamic,
            LinearVelocity(Vec2::new(30.0, 0.0)),
            at(10.0, 0.0),
        ))
        .id();

    hit(&mut app, attacker, corpse, AttackStrength::Heavy);
    app.update();

    let world = app.world();
    assert_eq!(*world.get::<RigidBody>(corpse).unwrap(), RigidBody::Dynamic);
    assert_eq!(world.get::<LinearVelocity>(corpse).unwrap().0, Vec2::new(30.0, 0.0));
    assert!(written::<DamageEvent>(&app).is_empty());
    assert!(written::<DeathEvent>(&app).is_empty());
}

#[test]
fn test_target_without_health_still_takes_knockback() {
    let mut app = combat_app();
    let attacker = spawn_attacker(&mut app);
    let crate_box = app
        .world_mut()
        .spawn((RigidBody::Dynamic, LinearVelocity::default(), at(0.0, -10.0)))
        .id();

    hit(&mut app, attacker, crate_box, AttackStrength::Light);
    app.update();

    assert!(written::<DamageEvent>(&app).is_empty());
    let velocity = app.world().get::<LinearVelocity>(crate_box).unwrap().0;
    assert_eq!(velocity, Vec2::new(0.0, -400.0));
}

#[test]
fn test_attacker_blood_scales_damage() {
    let mut app = combat_app();
    let tuning = CombatDefaults::default().blood;
    let mut meter = BloodMeter::new(tuning.max);
    meter.drain(tuning.max);

    let attacker = app
        .world_mut()
        .spawn((Combatant, profile(), meter, at(0.0, 0.0)))
        .id();
    let target = app
        .world_mut()
        .spawn((Health::new(500.0), at(10.0, 0.0)))
        .id();

    hit(&mut app, attacker, target, AttackStrength::Light);
    app.update();

    let damage = written::<DamageEvent>(&app);
    assert_eq!(damage.len(), 1);
    assert_eq!(damage[0].amount, 10.0 * tuning.damage_modifiers.severe);
}

#[test]
fn test_death_is_reported_once_and_schedules_despawn() {
    let mut app = combat_app();
    let source = spawn_attacker(&mut app);
    let target = app
        .world_mut()
        .spawn((Health::new(15.0), DespawnOnDeath, at(0.0, 0.0)))
        .id();

    for _ in 0..3 {
        app.world_mut().write_message(DamageEvent {
            source,
            target,
            amount: 10.0,
            strength: AttackStrength::Light,
        });
    }
    app.update();
    app.world_mut().write_message(DamageEvent {
        source,
        target,
        amount: 10.0,
        strength: AttackStrength::Light,
    });
    app.update();

    let deaths = written::<DeathEvent>(&app);
    assert_eq!(deaths.len(), 1);
    assert_eq!(deaths[0].entity, target);
    assert_eq!(deaths[0].killer, source);
    assert!(app.world().get::<Health>(target).unwrap().is_dead());
    assert!(
        app.world()
            .resource::<TimerWheel>()
            .is_pending(target, TimerPurpose::Despawn)
    );
}

#[test]
fn test_death_without_despawn_marker_keeps_corpse() {
    let mut app = combat_app();
    let source = spawn_attacker(&mut app);
    let target = app
        .world_mut()
        .spawn((Health::new(5.0), at(0.0, 0.0)))
        .id();

    app.world_mut().write_message(DamageEvent {
        source,
        target,
        amount: 10.0,
        strength: AttackStrength::Heavy,
    });
    app.update();

    assert_eq!(written::<DeathEvent>(&app).len(), 1);
    assert!(app.world().resource::<TimerWheel>().is_empty());
}

#[test]
fn test_drops_follow_strength_tier() {
    let mut app = combat_app();
    let source = spawn_attacker(&mut app);
    let target = app
        .world_mut()
        .spawn((
            Health::new(1000.0),
            DropTable {
                light: DropRange::fixed(1),
                heavy: DropRange::fixed(3),
            },
            at(0.0, 0.0),
        ))
        .id();

    app.world_mut().write_message(DamageEvent {
        source,
        target,
        amount: 1.0,
        strength: AttackStrength::Light,
    });
    app.update();
    assert_eq!(pickup_count(&mut app), 1);

    app.world_mut().write_message(DamageEvent {
        source,
        target,
        amount: 1.0,
        strength: AttackStrength::Heavy,
    });
    app.update();
    assert_eq!(pickup_count(&mut app), 4);
}
