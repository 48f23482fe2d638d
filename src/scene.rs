use std::collections::HashSet;

use slotmap::{SlotMap, new_key_type};

use crate::entity::Entity;
use crate::frame::Frame;

new_key_type! {
    /// Generational entity handle. A handle to a removed entity never
    /// resolves again, even after its slot is reused.
    pub struct EntityId;
}

/// Scene owns its entities and updates them once per pass, in the order they
/// were added.
///
/// During [`Scene::update`]:
/// - entities created by the pass are first updated on the next pass;
/// - [`Scene::kill`] only marks the entity, it is skipped for the rest of the
///   pass and removed when the pass ends;
/// - the entity being updated is lifted out of its slot, so the others can be
///   read and mutated through the scene in the meantime.
#[derive(Default)]
pub struct Scene {
    entities: SlotMap<EntityId, Option<Entity>>,
    order: Vec<EntityId>,
    doomed: HashSet<EntityId>,
    updating: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_entity(&mut self) -> EntityId {
        self.add_entity(Entity::new())
    }

    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = self.entities.insert(Some(entity));
        self.order.push(id);
        log::trace!("created entity {id:?}");
        id
    }

    /// Detaches the entity immediately and hands it back. Returns `None` for
    /// stale handles, and for the entity currently running its own update
    /// (which is then dropped once its update returns).
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.entities.remove(id)?;
        self.order.retain(|other| *other != id);
        self.doomed.remove(&id);
        log::trace!("removed entity {id:?}");
        slot
    }

    /// Requests removal. Safe to call from inside any component update;
    /// returns false if the handle was already dead.
    pub fn kill(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }

        if self.updating {
            self.doomed.insert(id);
        } else {
            self.remove_entity(id);
        }
        true
    }

    /// Handle still refers to an entity of this scene, killed or not
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.contains(id) && !self.doomed.contains(&id)
    }

    /// Live entity behind `id`. Killed entities and the entity currently
    /// updating resolve to `None`.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        if self.doomed.contains(&id) {
            return None;
        }
        self.entities.get(id)?.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if self.doomed.contains(&id) {
            return None;
        }
        self.entities.get_mut(id)?.as_mut()
    }

    /// Live entities in update order, skipping the one currently updating
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.order.iter().filter_map(|&id| Some((id, self.get(id)?)))
    }

    pub fn len(&self) -> usize {
        self.order.len() - self.doomed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        log::debug!("clearing scene of {} entities", self.entities.len());
        self.entities.clear();
        self.order.clear();
        self.doomed.clear();
    }

    /// One pass over a snapshot of the entities alive when it starts
    pub fn update(&mut self, frame: &mut Frame<'_>) {
        self.updating = true;

        let pass = self.order.clone();
        for id in pass {
            if self.doomed.contains(&id) {
                continue;
            }
            let Some(mut entity) = self.entities.get_mut(id).and_then(Option::take) else {
                continue;
            };

            entity.update(id, self, frame);

            match self.entities.get_mut(id) {
                Some(slot) => *slot = Some(entity),
                None => log::trace!("entity {id:?} was removed during its own update"),
            }
        }

        self.updating = false;
        self.flush();
    }

    fn flush(&mut self) {
        if self.doomed.is_empty() {
            return;
        }

        for id in self.doomed.drain() {
            self.entities.remove(id);
            log::trace!("killed entity {id:?}");
        }
        self.order.retain(|id| self.entities.contains_key(*id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, Context};
    use crate::testing::Harness;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    type Visits = Rc<RefCell<HashMap<EntityId, u32>>>;

    /// Counts how often its entity was updated
    struct Visit(Visits);
    impl Component for Visit {
        fn update(&mut self, ctx: &mut Context<'_, '_>) {
            *self.0.borrow_mut().entry(ctx.id()).or_default() += 1;
        }
    }

    struct SelfKill;
    impl Component for SelfKill {
        fn update(&mut self, ctx: &mut Context<'_, '_>) {
            ctx.kill();
        }
    }

    struct KillOther(EntityId);
    impl Component for KillOther {
        fn update(&mut self, ctx: &mut Context<'_, '_>) {
            assert!(ctx.scene.kill(self.0));
            assert!(ctx.scene.get(self.0).is_none());
        }
    }

    /// Spawns one visited entity per update and remembers it
    struct Spawner {
        visits: Visits,
        spawned: Rc<RefCell<Vec<EntityId>>>,
    }
    impl Component for Spawner {
        fn update(&mut self, ctx: &mut Context<'_, '_>) {
            let child = ctx
                .scene
                .add_entity(Entity::new().with(Visit(self.visits.clone())));
            self.spawned.borrow_mut().push(child);
        }
    }

    /// Counts the other live entities it can see
    struct Census(Rc<RefCell<Vec<usize>>>);
    impl Component for Census {
        fn update(&mut self, ctx: &mut Context<'_, '_>) {
            assert!(ctx.scene.get(ctx.id()).is_none());
            self.0.borrow_mut().push(ctx.scene.iter().count());
        }
    }

    fn pass(scene: &mut Scene) {
        Harness::new().pass(scene, 0.016);
    }

    #[test]
    fn create_and_remove() {
        let mut scene = Scene::new();
        let a = scene.create_entity();
        let b = scene.create_entity();

        assert_eq!(scene.len(), 2);
        assert!(scene.remove_entity(a).is_some());
        assert!(scene.remove_entity(a).is_none());
        assert_eq!(scene.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn handles_are_never_reused() {
        let mut scene = Scene::new();
        let a = scene.create_entity();
        scene.remove_entity(a);
        let b = scene.create_entity();

        assert_ne!(a, b);
        assert!(scene.get(a).is_none());
        assert!(!scene.is_alive(a));
        assert!(scene.get(b).is_some());
    }

    #[test]
    fn kill_outside_a_pass_is_immediate() {
        let mut scene = Scene::new();
        let a = scene.create_entity();

        assert!(scene.kill(a));
        assert!(!scene.contains(a));
        assert!(scene.is_empty());
        assert!(!scene.kill(a));
    }

    #[test]
    fn self_kill_mid_pass() {
        let visits: Visits = Rc::default();
        let mut scene = Scene::new();
        let before = scene.add_entity(Entity::new().with(Visit(visits.clone())));
        let victim = scene.add_entity(Entity::new().with(Visit(visits.clone())).with(SelfKill));
        let after = scene.add_entity(Entity::new().with(Visit(visits.clone())));

        pass(&mut scene);

        assert_eq!(scene.len(), 2);
        assert!(!scene.contains(victim));
        let visits = visits.borrow();
        assert_eq!(visits[&before], 1);
        assert_eq!(visits[&victim], 1);
        assert_eq!(visits[&after], 1);
    }

    #[test]
    fn self_kill_skips_remaining_components() {
        let visits: Visits = Rc::default();
        let mut scene = Scene::new();
        let victim = scene.add_entity(Entity::new().with(SelfKill).with(Visit(visits.clone())));

        pass(&mut scene);

        assert!(!scene.contains(victim));
        assert!(visits.borrow().is_empty());
    }

    #[test]
    fn killed_later_entity_is_not_updated() {
        let visits: Visits = Rc::default();
        let mut scene = Scene::new();
        let killer = scene.create_entity();
        let target = scene.add_entity(Entity::new().with(Visit(visits.clone())));
        scene.get_mut(killer).unwrap().add(KillOther(target)).unwrap();

        pass(&mut scene);

        assert!(visits.borrow().get(&target).is_none());
        assert!(!scene.contains(target));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn spawned_entities_wait_for_next_pass() {
        let visits: Visits = Rc::default();
        let spawned = Rc::<RefCell<Vec<EntityId>>>::default();
        let mut scene = Scene::new();
        scene.add_entity(Entity::new().with(Spawner {
            visits: visits.clone(),
            spawned: spawned.clone(),
        }));

        pass(&mut scene);
        let first = spawned.borrow()[0];
        assert_eq!(scene.len(), 2);
        assert!(visits.borrow().get(&first).is_none());

        pass(&mut scene);
        assert_eq!(visits.borrow()[&first], 1);

        pass(&mut scene);
        assert_eq!(visits.borrow()[&first], 2);
        assert_eq!(scene.len(), 4);
    }

    #[test]
    fn running_entity_sees_the_others() {
        let seen = Rc::<RefCell<Vec<usize>>>::default();
        let mut scene = Scene::new();
        scene.create_entity();
        scene.add_entity(Entity::new().with(Census(seen.clone())));
        scene.create_entity();

        pass(&mut scene);

        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut scene = Scene::new();
        let a = scene.create_entity();
        scene.create_entity();

        scene.clear();

        assert!(scene.is_empty());
        assert!(scene.get(a).is_none());
    }

    #[test]
    fn removed_entity_keeps_its_components() {
        let mut scene = Scene::new();
        let id = scene.add_entity(Entity::new().with(SelfKill));

        let entity = scene.remove_entity(id).unwrap();

        assert!(entity.has::<SelfKill>());
        assert!(scene.get(id).is_none());
    }
}
