use crate::component::Component;

/// Category marker, read by other entities' components (e.g. contact checks)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntityTag {
    #[default]
    None,
    Player,
    Enemy,
    Trail,
}

impl Component for EntityTag {}
