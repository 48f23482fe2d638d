use std::collections::HashMap;
use std::fmt;

use crate::component::{Component, ComponentKey, Context};
use crate::error::{EcsError, Result};
use crate::frame::Frame;
use crate::scene::{EntityId, Scene};

struct Slot {
    key: ComponentKey,
    /// `None` while the component is running
    component: Option<Box<dyn Component>>,
    started: bool,
}

impl Slot {
    fn downcast_ref<T: Component>(&self) -> Option<&T> {
        let component: &dyn Component = self.component.as_deref()?;
        component.as_any().downcast_ref::<T>()
    }

    fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        let component: &mut dyn Component = self.component.as_deref_mut()?;
        component.as_any_mut().downcast_mut::<T>()
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Start,
    Update,
}

/// Entity owns at most one component per concrete type, kept in attachment
/// order. It gets its identity ([`EntityId`]) from the [`Scene`] that holds it.
#[derive(Default)]
pub struct Entity {
    slots: Vec<Slot>,
    index: HashMap<ComponentKey, usize>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `add`; a duplicate is dropped with a warning
    pub fn with<T: Component>(mut self, component: T) -> Self {
        if let Err(err) = self.add(component) {
            log::warn!("{err}, keeping the existing one");
        }
        self
    }

    /// Attaches `component`. Fails, leaving the entity untouched, when a
    /// component of the same type is already attached.
    pub fn add<T: Component>(&mut self, component: T) -> Result<&mut T> {
        let key = ComponentKey::of::<T>();
        if self.index.contains_key(&key) {
            return Err(EcsError::DuplicateComponent {
                component: key.name(),
            });
        }

        self.index.insert(key, self.slots.len());
        self.slots.push(Slot {
            key,
            component: Some(Box::new(component)),
            started: false,
        });

        match self.slots.last_mut().and_then(Slot::downcast_mut::<T>) {
            Some(component) => Ok(component),
            None => unreachable!("slot for {key:?} was just filled"),
        }
    }

    pub fn get<T: Component>(&self) -> Option<&T> {
        let index = *self.index.get(&ComponentKey::of::<T>())?;
        self.slots[index].downcast_ref()
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        let index = *self.index.get(&ComponentKey::of::<T>())?;
        self.slots[index].downcast_mut()
    }

    pub fn has<T: Component>(&self) -> bool {
        self.index.contains_key(&ComponentKey::of::<T>())
    }

    /// Detaches and returns the component. A component that removes itself
    /// while running is dropped once it returns, so this yields `None` then.
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        let index = self.index.remove(&ComponentKey::of::<T>())?;
        let slot = self.slots.remove(index);

        for (position, later) in self.slots.iter().enumerate().skip(index) {
            self.index.insert(later.key, position);
        }

        let component = slot.component?;
        component.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Keys of the attached components, in attachment order
    pub fn keys(&self) -> impl Iterator<Item = ComponentKey> + '_ {
        self.slots.iter().map(|slot| slot.key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Runs `start` on every component not started yet, then `update` on every
    /// started one. Components attached during this call wait for the next.
    pub(crate) fn update(&mut self, id: EntityId, scene: &mut Scene, frame: &mut Frame<'_>) {
        let pending: Vec<ComponentKey> = self
            .slots
            .iter()
            .filter(|slot| !slot.started)
            .map(|slot| slot.key)
            .collect();

        for key in pending {
            self.run(key, Phase::Start, id, scene, frame);
            if !scene.is_alive(id) {
                return;
            }
        }

        let live: Vec<ComponentKey> = self
            .slots
            .iter()
            .filter(|slot| slot.started)
            .map(|slot| slot.key)
            .collect();

        for key in live {
            self.run(key, Phase::Update, id, scene, frame);
            if !scene.is_alive(id) {
                return;
            }
        }
    }

    fn run(
        &mut self,
        key: ComponentKey,
        phase: Phase,
        id: EntityId,
        scene: &mut Scene,
        frame: &mut Frame<'_>,
    ) {
        let Some(&index) = self.index.get(&key) else {
            return;
        };
        let Some(mut component) = self.slots[index].component.take() else {
            return;
        };

        {
            let mut ctx = Context::new(id, self, scene, frame);
            match phase {
                Phase::Start => component.start(&mut ctx),
                Phase::Update => component.update(&mut ctx),
            }
        }

        // the component may have removed or replaced itself meanwhile
        if let Some(&index) = self.index.get(&key) {
            let slot = &mut self.slots[index];
            if slot.component.is_none() {
                slot.component = Some(component);
                slot.started = true;
            }
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
