//! Scene state: the overlay catalog and the ordered layer store.

pub(crate) mod catalog;
pub(crate) mod layers;
