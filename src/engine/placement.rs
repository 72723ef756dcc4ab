//! Where copies go in their sibling collection, and in which order

use super::duplicator::Entity;
use super::request::{DuplicationRequest, GroupingStrategy, OrderingStrategy, Placement, Position};
use log::debug;

/// Position used for `end` placement before renumbering
pub const END_POSITION_BASE: i64 = 999_999;

/// Multi-entity strategy, derived from ordering and grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiStrategy {
    /// A1, B1, C1, A2, B2, C2 in one block after the last original
    Interleaved,
    /// A1, A2, B1, B2, C1, C2 in one block after the last original
    SequentialGrouped,
    /// Each original gets its own copies, placed as for a single entity
    SequentialRelative,
}

impl MultiStrategy {
    pub fn of(request: &DuplicationRequest) -> Self {
        match (request.ordering_strategy, request.grouping_strategy) {
            (OrderingStrategy::Interleaved, _) => MultiStrategy::Interleaved,
            (OrderingStrategy::Sequential, GroupingStrategy::Grouped) => MultiStrategy::SequentialGrouped,
            (OrderingStrategy::Sequential, GroupingStrategy::Relative) => MultiStrategy::SequentialRelative,
        }
    }
}

/// Order position of copy `copy_index` before any renumbering
pub fn provisional_position(original: i64, position: Position, copy_index: usize) -> i64 {
    let i = copy_index as i64;
    match position {
        Position::After => original + i + 1,
        Position::Before => original + i,
        Position::Start => i + 1,
        Position::End => END_POSITION_BASE + i,
    }
}

/// Index at which a run of copies is spliced into a container of `len` items
pub fn insertion_index(original_index: usize, len: usize, position: Position) -> usize {
    match position {
        Position::After => (original_index + 1).min(len),
        Position::Before => original_index.min(len),
        Position::Start => 0,
        Position::End => len,
    }
}

/// `(entity, generation)` pairs in the order copies are emitted
pub fn emission_order(entities: usize, copies: usize, strategy: OrderingStrategy) -> Vec<(usize, usize)> {
    match strategy {
        OrderingStrategy::Interleaved => (0..copies)
            .flat_map(|generation| (0..entities).map(move |entity| (entity, generation)))
            .collect(),
        OrderingStrategy::Sequential => (0..entities)
            .flat_map(|entity| (0..copies).map(move |generation| (entity, generation)))
            .collect(),
    }
}

/// Rewrite every order position as 1..=len in array order
pub fn renumber<E: Entity>(container: &mut [E]) {
    for (i, entity) in container.iter_mut().enumerate() {
        entity.set_order_position(i as i64 + 1);
    }
}

/// Splice `copies` into `container` relative to the original at `original_index`
pub fn place_copies<E: Entity>(container: &mut Vec<E>, original_index: usize, copies: Vec<E>, placement: &Placement) {
    let at = insertion_index(original_index, container.len(), placement.position);
    debug!("Inserting {} {} copies at index {}", copies.len(), E::KIND, at);
    container.splice(at..at, copies);
    if placement.auto_shift {
        renumber(container);
    }
}

/// Insert `copies` as one block right after `last_index`
pub fn insert_block_after<E: Entity>(container: &mut Vec<E>, last_index: usize, copies: Vec<E>, auto_shift: bool) {
    let at = (last_index + 1).min(container.len());
    debug!("Inserting block of {} {} copies at index {}", copies.len(), E::KIND, at);
    container.splice(at..at, copies);
    if auto_shift {
        renumber(container);
    }
}
