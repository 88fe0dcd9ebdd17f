//! World frame integration tests: registration, reaping, draw order and the
//! transform cache across whole input/update/output passes.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};

use astroblast::actors::{Actor, ActorId, ActorState, Behavior, Pose};
use astroblast::components::Component;
use astroblast::components::movement::MoveComponent;
use astroblast::components::sprite::SpriteComponent;
use astroblast::math::scale_rotate_translate;
use astroblast::platform::headless::{HeadlessTextureLoader, RecordingRenderer};
use astroblast::resources::input::{Key, KeyboardState};
use astroblast::world::World;

const EPSILON: f32 = 1e-4;

fn new_world() -> World {
    World::new(
        Box::new(HeadlessTextureLoader::default()),
        4,
        Vec2::new(1024.0, 768.0),
    )
}

/// Shared log of what happened, in order.
type Log = Rc<RefCell<Vec<String>>>;

/// Spawns a child during input when `Enter` is held, logs its updates.
struct Parent {
    log: Log,
    child: Option<ActorId>,
}

impl Behavior for Parent {
    fn name(&self) -> &'static str {
        "parent"
    }

    fn input_actor(&mut self, actor: &mut Actor, world: &mut World, keys: &KeyboardState) {
        if keys.is_down(Key::Enter) && self.child.is_none() {
            let mut child = Actor::with_behavior(Child { log: self.log.clone() });
            child.set_position(actor.position() + Vec2::new(10.0, 0.0));
            self.child = Some(world.add_actor(child));
        }
    }

    fn update_actor(&mut self, _actor: &mut Actor, _world: &mut World, _dt: f32) {
        self.log.borrow_mut().push("update:parent".to_string());
    }
}

struct Child {
    log: Log,
}

impl Behavior for Child {
    fn name(&self) -> &'static str {
        "child"
    }

    fn update_actor(&mut self, _actor: &mut Actor, _world: &mut World, _dt: f32) {
        self.log.borrow_mut().push("update:child".to_string());
    }
}

/// Kills the target actor on its first update, once.
struct Assassin {
    target: ActorId,
    done: bool,
}

impl Behavior for Assassin {
    fn name(&self) -> &'static str {
        "assassin"
    }

    fn update_actor(&mut self, _actor: &mut Actor, world: &mut World, _dt: f32) {
        if !self.done {
            if let Some(target) = world.actor_mut(self.target) {
                target.set_state(ActorState::Dead);
            }
            self.done = true;
        }
    }
}

/// Counts updates of its owner.
struct Counter {
    updates: Rc<RefCell<u32>>,
}

impl Component for Counter {
    fn update(&mut self, _owner: &mut Pose, _dt: f32) {
        *self.updates.borrow_mut() += 1;
    }
}

#[test]
fn actor_spawned_during_input_joins_after_update_pass() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut world = new_world();
    let parent = world.add_actor(Actor::with_behavior(Parent {
        log: log.clone(),
        child: None,
    }));

    world.process_input(&KeyboardState::with_pressed(&[Key::Enter]));
    assert_eq!(world.live_actors(), &[parent]);
    assert_eq!(world.pending_actors().len(), 1);
    let child = world.pending_actors()[0];

    world.update(0.016);
    // The child was pending during the pass, so only the parent updated.
    assert_eq!(*log.borrow(), vec!["update:parent"]);
    assert_eq!(world.live_actors(), &[parent, child]);
    assert!(world.pending_actors().is_empty());

    // Visible with an already computed transform.
    let child_actor = world.actor(child).unwrap();
    assert!(!child_actor.pose().is_dirty());
    let expected = scale_rotate_translate(1.0, 0.0, Vec2::new(10.0, 0.0));
    assert!(child_actor.pose().world_transform().abs_diff_eq(expected, EPSILON));

    log.borrow_mut().clear();
    world.update(0.016);
    assert_eq!(*log.borrow(), vec!["update:parent", "update:child"]);
}

#[test]
fn actor_killed_before_its_turn_is_not_updated_and_reaped() {
    let mut world = new_world();
    let updates = Rc::new(RefCell::new(0));

    // The assassin updates first; aim it once the victim exists.
    let assassin = world.add_actor(Actor::with_behavior(Assassin {
        target: ActorId::default(),
        done: false,
    }));
    let mut victim = Actor::new();
    victim.add_component(Counter {
        updates: updates.clone(),
    });
    let victim = world.add_actor(victim);
    world
        .actor_mut(assassin)
        .and_then(|a| a.behavior_mut::<Assassin>())
        .unwrap()
        .target = victim;

    world.update(0.016);
    assert_eq!(*updates.borrow(), 0);
    assert!(!world.contains(victim));
    assert_eq!(world.live_actors(), &[assassin]);
}

#[test]
fn actor_killed_after_its_turn_was_updated_this_frame() {
    let mut world = new_world();
    let updates = Rc::new(RefCell::new(0));

    let mut victim = Actor::new();
    victim.add_component(Counter {
        updates: updates.clone(),
    });
    let victim = world.add_actor(victim);
    world.add_actor(Actor::with_behavior(Assassin {
        target: victim,
        done: false,
    }));

    world.update(0.016);
    assert_eq!(*updates.borrow(), 1);
    assert!(!world.contains(victim));
    assert!(!world.live_actors().contains(&victim));
}

#[test]
fn sprites_draw_in_ascending_order_with_fresh_transforms() {
    let mut world = new_world();
    let front_texture = world.get_texture("front.png").unwrap();
    let back_texture = world.get_texture("back.png").unwrap();

    let front = world.add_actor(Actor::new());
    world
        .add_component(front, SpriteComponent::new(200).with_texture(front_texture))
        .unwrap();
    let back = world.add_actor(Actor::new());
    world
        .add_component(back, SpriteComponent::new(10).with_texture(back_texture))
        .unwrap();

    // Moved after the last update: draw must still see the new pose.
    world
        .actor_mut(front)
        .unwrap()
        .set_position(Vec2::new(300.0, 200.0));

    let mut renderer = RecordingRenderer::default();
    world.draw(&mut renderer).unwrap();

    let quads = renderer.quads();
    assert_eq!(quads.len(), 2);
    assert_eq!(quads[0].texture, back_texture.id);
    assert_eq!(quads[1].texture, front_texture.id);

    let center = quads[1].model.transform_point3(Vec3::ZERO);
    assert!((center.x - 300.0).abs() < EPSILON);
    assert!((center.y - 200.0).abs() < EPSILON);
    assert!(!world.actor(front).unwrap().pose().is_dirty());
}

#[test]
fn moving_actor_transform_is_current_after_update() {
    let mut world = new_world();
    let mut actor = Actor::new();
    let mut movement = MoveComponent::new(1.0).unwrap();
    movement.set_velocity(Vec2::new(100.0, 0.0));
    actor.add_component(movement);
    let id = world.add_actor(actor);

    for _ in 0..10 {
        world.update(0.01);
    }

    let actor = world.actor(id).unwrap();
    assert!((actor.position().x - 10.0).abs() < EPSILON);
    assert!(!actor.pose().is_dirty());
    let expected = scale_rotate_translate(1.0, 0.0, actor.position());
    assert!(actor.pose().world_transform().abs_diff_eq(expected, EPSILON));
}

#[test]
fn deleting_an_actor_detaches_everything() {
    let mut world = new_world();
    let mut actor = Actor::new();
    actor.add_component(SpriteComponent::new(1));
    actor.add_component(SpriteComponent::new(2));
    actor.add_component(MoveComponent::new(1.0).unwrap());
    let id = world.add_actor(actor);
    world.add_to_group("a", id);
    world.add_to_group("b", id);

    assert!(world.delete_actor(id));
    assert!(world.sprites().is_empty());
    assert!(world.group("a").is_empty());
    assert!(world.group("b").is_empty());
    assert!(world.actor(id).is_none());
    // Double removal is tolerated.
    assert!(!world.delete_actor(id));
    assert!(!world.remove_actor(id));
}
