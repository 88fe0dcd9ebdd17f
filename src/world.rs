//! Actor registry and per-frame passes.
//!
//! The [`World`] owns every actor, the draw-order sorted sprite list, the
//! texture cache, the actor groups and the random generator.
//!
//! # Deferred registration
//!
//! While an input or update pass is running the world is flagged as
//! *updating*. Actors added in that window (a ship firing a laser, say) go to
//! the pending list and join the live list once the update pass ends, with
//! their world transform already computed. Removal tolerates ids that are in
//! neither list.
//!
//! # Lending
//!
//! An actor's slot is emptied while its own hook runs, so the hook can take
//! `&mut Actor` and `&mut World` together. During that call the running actor
//! is invisible to world lookups. If the actor is deleted meanwhile, it is
//! dropped when the hook returns.
//!
//! # Frame
//!
//! ```text
//! process_input(keys)   live actors, registration order
//! update(dt)            live actors -> commit pending -> reap Dead
//! draw(renderer)        sprites, ascending draw order
//! ```

use glam::{Mat4, Vec2, Vec3};
use log::{debug, trace, warn};
use slotmap::SlotMap;

use crate::actors::{Actor, ActorId, ActorState, SpriteChange};
use crate::components::{Component, ComponentId};
use crate::error::{AssetError, RenderError};
use crate::math::simple_view_projection;
use crate::platform::{Color, RenderBackend};
use crate::resources::group::ActorGroups;
use crate::resources::input::KeyboardState;
use crate::resources::random::GameRng;
use crate::resources::texturestore::{Texture, TextureLoader, TextureStore};

/// Uniform receiving the view-projection matrix once per frame.
pub const VIEW_PROJECTION_UNIFORM: &str = "uViewProj";

pub const CLEAR_COLOR: Color = [220, 220, 220, 255];

/// A drawable component in the world's draw list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRef {
    pub draw_order: i32,
    pub actor: ActorId,
    pub component: ComponentId,
}

pub struct World {
    actors: SlotMap<ActorId, Option<Box<Actor>>>,
    live: Vec<ActorId>,
    pending: Vec<ActorId>,
    sprites: Vec<SpriteRef>,
    textures: TextureStore,
    groups: ActorGroups,
    rng: GameRng,
    arena: Vec2,
    view_projection: Mat4,
    updating: bool,
}

impl World {
    /// `arena` is the playfield size; the view maps it onto the whole window,
    /// origin bottom-left.
    pub fn new(loader: Box<dyn TextureLoader>, seed: u64, arena: Vec2) -> Self {
        let view_projection = simple_view_projection(arena.x, arena.y)
            * Mat4::from_translation(Vec3::new(-arena.x / 2.0, -arena.y / 2.0, 0.0));
        Self {
            actors: SlotMap::with_key(),
            live: Vec::new(),
            pending: Vec::new(),
            sprites: Vec::new(),
            textures: TextureStore::new(loader),
            groups: ActorGroups::default(),
            rng: GameRng::with_seed(seed),
            arena,
            view_projection,
            updating: false,
        }
    }

    pub fn arena(&self) -> Vec2 {
        self.arena
    }

    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    pub fn rng(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// True while an input or update pass is running.
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    // ---------------- registration ----------------

    /// Take ownership of `actor` and register it, live or pending.
    pub fn add_actor(&mut self, actor: Actor) -> ActorId {
        let id = self.actors.insert(None);
        let mut actor = Box::new(actor);
        actor.set_id(id);
        self.apply_sprite_changes(id, actor.take_sprite_changes());

        if self.updating {
            trace!("Queued {} {:?} while updating", actor.name(), id);
            self.pending.push(id);
        } else {
            actor.compute_world_transform();
            self.live.push(id);
        }
        debug!("Added {} {:?}", actor.name(), id);

        if let Some(slot) = self.actors.get_mut(id) {
            *slot = Some(actor);
        }
        id
    }

    /// Take `id` out of the live and pending lists. The actor stays owned by the world.
    pub fn remove_actor(&mut self, id: ActorId) -> bool {
        let mut found = false;
        if let Some(index) = self.pending.iter().position(|a| *a == id) {
            self.pending.remove(index);
            found = true;
        }
        if let Some(index) = self.live.iter().position(|a| *a == id) {
            self.live.remove(index);
            found = true;
        }
        found
    }

    /// Destroy an actor: deregister it everywhere and detach its components.
    /// Returns false if `id` is unknown.
    pub fn delete_actor(&mut self, id: ActorId) -> bool {
        self.remove_actor(id);
        self.groups.remove_everywhere(id);
        self.sprites.retain(|s| s.actor != id);

        match self.actors.remove(id) {
            Some(Some(mut actor)) => {
                let detached = actor.remove_all_components();
                debug!("Deleted {} {:?} ({} components)", actor.name(), id, detached);
                true
            }
            // Lent out to its own hook; dropped when the hook returns.
            Some(None) => {
                debug!("Deleted running actor {:?}", id);
                true
            }
            None => false,
        }
    }

    /// Delete every actor, newest first.
    pub fn clear(&mut self) {
        let ids: Vec<ActorId> = self.actors.keys().collect();
        for id in ids.into_iter().rev() {
            self.delete_actor(id);
        }
        self.live.clear();
        self.pending.clear();
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(id)
    }

    /// `None` for unknown ids and for the actor whose hook is running.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)?.as_deref()
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)?.as_deref_mut()
    }

    pub fn live_actors(&self) -> &[ActorId] {
        &self.live
    }

    pub fn pending_actors(&self) -> &[ActorId] {
        &self.pending
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    // ---------------- components ----------------

    /// Attach a component to a registered actor, adding it to the draw list if drawable.
    pub fn add_component(&mut self, actor: ActorId, component: impl Component) -> Option<ComponentId> {
        let id = self.actor_mut(actor)?.add_component(component);
        self.sync_sprites(actor);
        Some(id)
    }

    /// Detach a component, dropping it from the draw list. `None` if not attached.
    pub fn remove_component(
        &mut self,
        actor: ActorId,
        component: ComponentId,
    ) -> Option<Box<dyn Component>> {
        let removed = self.actor_mut(actor)?.remove_component(component);
        self.sync_sprites(actor);
        removed
    }

    /// Bring the draw list up to date with components attached or detached
    /// directly on one actor.
    fn sync_sprites(&mut self, id: ActorId) {
        let Some(Some(actor)) = self.actors.get_mut(id) else {
            return;
        };
        let changes = actor.take_sprite_changes();
        self.apply_sprite_changes(id, changes);
    }

    fn sync_all_sprites(&mut self) {
        let changes: Vec<(ActorId, SpriteChange)> = self
            .actors
            .iter_mut()
            .filter_map(|(id, slot)| slot.as_deref_mut().map(|actor| (id, actor)))
            .flat_map(|(id, actor)| {
                actor
                    .take_sprite_changes()
                    .into_iter()
                    .map(move |change| (id, change))
            })
            .collect();
        for (id, change) in changes {
            self.apply_sprite_change(id, change);
        }
    }

    fn apply_sprite_changes(&mut self, id: ActorId, changes: impl IntoIterator<Item = SpriteChange>) {
        for change in changes {
            self.apply_sprite_change(id, change);
        }
    }

    fn apply_sprite_change(&mut self, actor: ActorId, change: SpriteChange) {
        match change {
            SpriteChange::Attached {
                component,
                draw_order,
            } => self.register_sprite(actor, component, draw_order),
            SpriteChange::Detached(component) => self
                .sprites
                .retain(|s| !(s.actor == actor && s.component == component)),
        }
    }

    fn register_sprite(&mut self, actor: ActorId, component: ComponentId, draw_order: i32) {
        let index = self.sprites.partition_point(|s| s.draw_order <= draw_order);
        self.sprites.insert(
            index,
            SpriteRef {
                draw_order,
                actor,
                component,
            },
        );
    }

    pub fn sprites(&self) -> &[SpriteRef] {
        &self.sprites
    }

    // ---------------- textures ----------------

    pub fn get_texture(&mut self, path: &str) -> Result<Texture, AssetError> {
        self.textures.get(path)
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn unload_textures(&mut self) {
        self.textures.unload_all();
    }

    // ---------------- groups ----------------

    pub fn add_to_group(&mut self, group: &str, actor: ActorId) {
        self.groups.add(group, actor);
    }

    pub fn remove_from_group(&mut self, group: &str, actor: ActorId) -> bool {
        self.groups.remove(group, actor)
    }

    pub fn group(&self, group: &str) -> &[ActorId] {
        self.groups.members(group)
    }

    // ---------------- frame passes ----------------

    fn lend(&mut self, id: ActorId) -> Option<Box<Actor>> {
        self.actors.get_mut(id)?.take()
    }

    fn give_back(&mut self, id: ActorId, mut actor: Box<Actor>) {
        match self.actors.get_mut(id) {
            Some(slot) => {
                *slot = Some(actor);
                self.sync_sprites(id);
            }
            None => {
                actor.remove_all_components();
                trace!("Dropped {} {:?} deleted during its own hook", actor.name(), id);
            }
        }
    }

    /// Dispatch `keys` to every live actor.
    pub fn process_input(&mut self, keys: &KeyboardState) {
        self.updating = true;
        let ids = self.live.clone();
        for id in ids {
            let Some(mut actor) = self.lend(id) else {
                continue;
            };
            actor.handle_input(self, keys);
            self.give_back(id, actor);
        }
        self.updating = false;
    }

    /// Update every live actor, then commit pending actors and reap the dead.
    pub fn update(&mut self, dt: f32) {
        self.updating = true;
        let ids = self.live.clone();
        for id in ids {
            let Some(mut actor) = self.lend(id) else {
                continue;
            };
            actor.update(self, dt);
            self.give_back(id, actor);
        }
        self.updating = false;

        self.commit_pending();
        self.reap_dead();
        self.sync_all_sprites();
    }

    fn commit_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for id in pending {
            if let Some(actor) = self.actor_mut(id) {
                actor.compute_world_transform();
                self.live.push(id);
            }
        }
    }

    fn reap_dead(&mut self) -> usize {
        let dead: Vec<ActorId> = self
            .live
            .iter()
            .copied()
            .filter(|id| {
                self.actor(*id)
                    .is_some_and(|a| a.state() == ActorState::Dead)
            })
            .collect();
        for id in &dead {
            self.delete_actor(*id);
        }
        if !dead.is_empty() {
            debug!("Reaped {} dead actors", dead.len());
        }
        dead.len()
    }

    /// Draw every sprite in ascending draw order. A failing sprite is logged
    /// and skipped; only a failure to finish the frame is returned.
    pub fn draw(&mut self, renderer: &mut dyn RenderBackend) -> Result<(), RenderError> {
        self.sync_all_sprites();
        renderer.begin_frame(CLEAR_COLOR);
        renderer.set_active();
        renderer.set_matrix_uniform(VIEW_PROJECTION_UNIFORM, &self.view_projection);

        for sprite in &self.sprites {
            let Some(Some(actor)) = self.actors.get_mut(sprite.actor) else {
                continue;
            };
            actor.compute_world_transform();
            let Some(entry) = actor.component_by_id(sprite.component) else {
                continue;
            };
            if let Err(e) = entry.component().draw(actor.pose(), renderer) {
                warn!(
                    "Failed to draw {} {:?}: {}",
                    actor.name(),
                    sprite.actor,
                    e
                );
            }
        }

        renderer.end_frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::Behavior;
    use crate::components::sprite::SpriteComponent;
    use crate::platform::headless::{HeadlessTextureLoader, RecordingRenderer};

    fn world() -> World {
        World::new(
            Box::new(HeadlessTextureLoader::default()),
            4,
            Vec2::new(1024.0, 768.0),
        )
    }

    /// Spawns one child on its first update.
    struct Spawner {
        spawned: Option<ActorId>,
    }

    impl Behavior for Spawner {
        fn name(&self) -> &'static str {
            "spawner"
        }

        fn update_actor(&mut self, _actor: &mut Actor, world: &mut World, _dt: f32) {
            if self.spawned.is_none() {
                let mut child = Actor::new();
                child.set_position(Vec2::new(3.0, 4.0));
                let id = world.add_actor(child);
                assert!(world.pending_actors().contains(&id));
                assert!(!world.live_actors().contains(&id));
                self.spawned = Some(id);
            }
        }
    }

    /// Marks itself dead on its first update.
    struct Suicide;

    impl Behavior for Suicide {
        fn name(&self) -> &'static str {
            "suicide"
        }

        fn update_actor(&mut self, actor: &mut Actor, _world: &mut World, _dt: f32) {
            actor.set_state(ActorState::Dead);
        }
    }

    /// Puts on a sprite during its first update, takes it off during the second.
    struct Costume {
        texture: Texture,
        worn: Option<ComponentId>,
    }

    impl Behavior for Costume {
        fn name(&self) -> &'static str {
            "costume"
        }

        fn update_actor(&mut self, actor: &mut Actor, _world: &mut World, _dt: f32) {
            match self.worn.take() {
                None => {
                    let sprite = SpriteComponent::new(5).with_texture(self.texture);
                    self.worn = Some(actor.add_component(sprite));
                }
                Some(id) => {
                    actor.remove_component(id);
                }
            }
        }
    }

    #[test]
    fn test_add_outside_pass_goes_live() {
        let mut world = world();
        let id = world.add_actor(Actor::new());
        assert_eq!(world.live_actors(), &[id]);
        assert!(world.pending_actors().is_empty());
        assert!(!world.actor(id).unwrap().pose().is_dirty());
    }

    #[test]
    fn test_spawn_during_update_is_deferred() {
        let mut world = world();
        let spawner = world.add_actor(Actor::with_behavior(Spawner { spawned: None }));
        world.update(0.016);

        let child = world
            .actor(spawner)
            .and_then(|a| a.behavior::<Spawner>())
            .and_then(|b| b.spawned)
            .unwrap();
        assert_eq!(world.live_actors(), &[spawner, child]);
        assert!(world.pending_actors().is_empty());
        let child = world.actor(child).unwrap();
        assert!(!child.pose().is_dirty());
        assert_eq!(child.pose().world_transform().w_axis.x, 3.0);
    }

    #[test]
    fn test_dead_actor_is_reaped_with_components() {
        let mut world = world();
        let id = world.add_actor(Actor::with_behavior(Suicide));
        world.add_component(id, SpriteComponent::default()).unwrap();
        world.add_to_group("doomed", id);
        assert_eq!(world.sprites().len(), 1);

        world.update(0.016);
        assert!(!world.contains(id));
        assert!(world.live_actors().is_empty());
        assert!(world.sprites().is_empty());
        assert!(world.group("doomed").is_empty());
    }

    #[test]
    fn test_remove_actor_tolerates_absence() {
        let mut world = world();
        let id = world.add_actor(Actor::new());
        assert!(world.remove_actor(id));
        assert!(!world.remove_actor(id));
        assert!(world.delete_actor(id));
        assert!(!world.delete_actor(id));
    }

    #[test]
    fn test_sprites_sorted_by_draw_order() {
        let mut world = world();
        let a = world.add_actor(Actor::new());
        let b = world.add_actor(Actor::new());
        world.add_component(a, SpriteComponent::new(150)).unwrap();
        world.add_component(b, SpriteComponent::new(100)).unwrap();
        world.add_component(a, SpriteComponent::new(100)).unwrap();
        world.add_component(b, SpriteComponent::new(50)).unwrap();

        let orders: Vec<i32> = world.sprites().iter().map(|s| s.draw_order).collect();
        assert_eq!(orders, vec![50, 100, 100, 150]);
        // Equal orders keep registration order.
        assert_eq!(world.sprites()[1].actor, b);
        assert_eq!(world.sprites()[2].actor, a);
    }

    #[test]
    fn test_remove_component_deregisters_sprite() {
        let mut world = world();
        let id = world.add_actor(Actor::new());
        let sprite = world.add_component(id, SpriteComponent::default()).unwrap();
        assert!(world.remove_component(id, sprite).is_some());
        assert!(world.sprites().is_empty());
        assert!(world.remove_component(id, sprite).is_none());
    }

    #[test]
    fn test_add_actor_registers_existing_sprites() {
        let mut world = world();
        let mut actor = Actor::new();
        actor.add_component(SpriteComponent::new(7));
        let id = world.add_actor(actor);
        assert_eq!(world.sprites().len(), 1);
        assert_eq!(world.sprites()[0].actor, id);
    }

    #[test]
    fn test_sprite_attached_in_own_hook_is_drawn() {
        let mut world = world();
        let texture = world.get_texture("costume.png").unwrap();
        let id = world.add_actor(Actor::with_behavior(Costume {
            texture,
            worn: None,
        }));
        assert!(world.sprites().is_empty());

        world.update(0.016);
        assert_eq!(world.sprites().len(), 1);
        assert_eq!(world.sprites()[0].actor, id);
        assert_eq!(world.sprites()[0].draw_order, 5);

        let mut renderer = RecordingRenderer::default();
        world.draw(&mut renderer).unwrap();
        assert_eq!(renderer.quads().len(), 1);
        assert_eq!(renderer.quads()[0].texture, texture.id);

        world.update(0.016);
        assert!(world.sprites().is_empty());
    }

    #[test]
    fn test_sprite_changes_on_registered_actor_reach_draw_list() {
        let mut world = world();
        let texture = world.get_texture("rock.png").unwrap();
        let id = world.add_actor(Actor::new());

        let sprite = world
            .actor_mut(id)
            .unwrap()
            .add_component(SpriteComponent::new(1).with_texture(texture));
        let mut renderer = RecordingRenderer::default();
        world.draw(&mut renderer).unwrap();
        assert_eq!(world.sprites().len(), 1);
        assert_eq!(renderer.quads().len(), 1);

        assert!(world.actor_mut(id).unwrap().remove_component(sprite).is_some());
        let mut renderer = RecordingRenderer::default();
        world.draw(&mut renderer).unwrap();
        assert!(world.sprites().is_empty());
        assert!(renderer.quads().is_empty());
    }

    #[test]
    fn test_draw_skips_failing_sprite_and_finishes_frame() {
        let mut world = world();
        let good = world.get_texture("good.png").unwrap();
        let bad = world.get_texture("bad.png").unwrap();

        let a = world.add_actor(Actor::new());
        let b = world.add_actor(Actor::new());
        world
            .add_component(a, SpriteComponent::new(1).with_texture(bad))
            .unwrap();
        world
            .add_component(b, SpriteComponent::new(2).with_texture(good))
            .unwrap();

        let mut renderer = RecordingRenderer::default();
        renderer.fail_texture(bad.id);
        world.draw(&mut renderer).unwrap();

        assert_eq!(renderer.quads().len(), 1);
        assert_eq!(renderer.quads()[0].texture, good.id);
        assert_eq!(renderer.frames_ended(), 1);
        assert_eq!(renderer.clear_color(), Some(CLEAR_COLOR));
    }

    #[test]
    fn test_view_projection_maps_arena_to_clip_space() {
        let world = world();
        let vp = world.view_projection();
        let origin = vp.transform_point3(Vec3::ZERO);
        let corner = vp.transform_point3(Vec3::new(1024.0, 768.0, 0.0));
        assert!((origin.x + 1.0).abs() < 1e-5 && (origin.y + 1.0).abs() < 1e-5);
        assert!((corner.x - 1.0).abs() < 1e-5 && (corner.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_clear_deletes_everything() {
        let mut world = world();
        for _ in 0..3 {
            let id = world.add_actor(Actor::new());
            world.add_to_group("rocks", id);
        }
        world.clear();
        assert_eq!(world.actor_count(), 0);
        assert!(world.live_actors().is_empty());
        assert!(world.group("rocks").is_empty());
    }
}
