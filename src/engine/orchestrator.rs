//! Entry points of the duplication engine
//!
//! The input configuration is never touched: each call clones it once and
//! builds the result on the clone, so a failed call leaves nothing behind.

use super::duplicator::{Entity, copy_actions, copy_entity, position_in};
use super::ids::{IdGenerator, TimestampIdGenerator};
use super::mapping::IdMapping;
use super::placement::{self, MultiStrategy};
use super::remap::Generation;
use super::request::{DuplicationRequest, MAX_COPIES};
use crate::model::{Checklist, Configuration, EntityKind, Parameter, Selection, Stage, Task};
use anyhow::{Context, Result, ensure};
use log::{debug, info};

pub struct DuplicationEngine<G: IdGenerator = TimestampIdGenerator> {
    ids: G,
}

impl DuplicationEngine<TimestampIdGenerator> {
    pub fn new() -> Self {
        Self { ids: TimestampIdGenerator::new() }
    }
}

impl Default for DuplicationEngine<TimestampIdGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

/// One selected entity, resolved against the pristine configuration
struct Source<'s, E> {
    selection: &'s Selection,
    original: E,
    mapping: IdMapping,
}

impl<G: IdGenerator> DuplicationEngine<G> {
    pub fn with_generator(ids: G) -> Self {
        Self { ids }
    }

    /// Duplicate one entity `number_of_copies` times
    pub fn duplicate_entity(
        &mut self,
        config: &[Checklist],
        selection: &Selection,
        request: &DuplicationRequest,
    ) -> Result<Configuration> {
        check_request(request);
        info!(
            "Duplicating {} {} x{}",
            selection.kind, selection.id, request.number_of_copies
        );

        let mut modified = config.to_vec();
        match selection.kind {
            EntityKind::Stage => self.duplicate_single::<Stage>(&mut modified, selection, request)?,
            EntityKind::Task => self.duplicate_single::<Task>(&mut modified, selection, request)?,
            EntityKind::Parameter => self.duplicate_single::<Parameter>(&mut modified, selection, request)?,
        }
        Ok(modified)
    }

    /// Duplicate several entities of one kind with the request's multi-entity strategy
    pub fn duplicate_multiple_entities(
        &mut self,
        config: &[Checklist],
        selections: &[Selection],
        request: &DuplicationRequest,
    ) -> Result<Configuration> {
        ensure!(!selections.is_empty(), "No entities selected for duplication");
        let kind = selections[0].kind;
        ensure!(
            selections.iter().all(|selection| selection.kind == kind),
            "All selected entities must be of the same kind"
        );

        if selections.len() == 1 {
            return self.duplicate_entity(config, &selections[0], request);
        }

        check_request(request);
        info!(
            "Duplicating {} {}s x{} ({:?})",
            selections.len(),
            kind,
            request.number_of_copies,
            MultiStrategy::of(request)
        );

        let mut modified = config.to_vec();
        match kind {
            EntityKind::Stage => self.duplicate_many::<Stage>(&mut modified, selections, request)?,
            EntityKind::Task => self.duplicate_many::<Task>(&mut modified, selections, request)?,
            EntityKind::Parameter => self.duplicate_many::<Parameter>(&mut modified, selections, request)?,
        }
        Ok(modified)
    }

    fn duplicate_single<E: Entity>(
        &mut self,
        config: &mut Configuration,
        selection: &Selection,
        request: &DuplicationRequest,
    ) -> Result<()> {
        let source = self.resolve::<E>(config, selection, request)?;

        let copies = placed_copies(&source, request)?;
        let container = E::container_mut(checklist_mut(config, selection)?, &selection.path)?;
        let index = position_in(container, selection)?;
        placement::place_copies(container, index, copies, &request.placement);

        attach_actions(checklist_mut(config, selection)?, &source.mapping, request)
    }

    fn duplicate_many<E: Entity>(
        &mut self,
        config: &mut Configuration,
        selections: &[Selection],
        request: &DuplicationRequest,
    ) -> Result<()> {
        let mut sources = selections
            .iter()
            .map(|selection| self.resolve::<E>(config, selection, request))
            .collect::<Result<Vec<_>>>()?;
        sources.sort_by_key(|source| source.original.order_position());

        match MultiStrategy::of(request) {
            MultiStrategy::Interleaved | MultiStrategy::SequentialGrouped => {
                let copies = placement::emission_order(sources.len(), request.number_of_copies, request.ordering_strategy)
                    .into_iter()
                    .map(|(entity, generation)| {
                        let source = &sources[entity];
                        copy_entity(&source.original, &Generation::new(&source.mapping, generation, request))
                    })
                    .collect::<Result<Vec<E>>>()?;

                let last = sources.last().context("No entities selected for duplication")?;
                let container = E::container_mut(checklist_mut(config, last.selection)?, &last.selection.path)?;
                let last_index = position_in(container, last.selection)?;
                placement::insert_block_after(container, last_index, copies, request.placement.auto_shift);
            }
            MultiStrategy::SequentialRelative => {
                // Later entities first, so earlier ones are still where they were
                for source in sources.iter().rev() {
                    let copies = placed_copies(source, request)?;
                    let container = E::container_mut(checklist_mut(config, source.selection)?, &source.selection.path)?;
                    let index = position_in(container, source.selection)?;
                    placement::place_copies(container, index, copies, &request.placement);
                }
            }
        }

        for source in &sources {
            attach_actions(checklist_mut(config, source.selection)?, &source.mapping, request)?;
        }
        Ok(())
    }

    /// Find the selected entity and allocate ids for all of its generations
    fn resolve<'s, E: Entity>(
        &mut self,
        config: &[Checklist],
        selection: &'s Selection,
        request: &DuplicationRequest,
    ) -> Result<Source<'s, E>> {
        let checklist = config
            .get(selection.path.checklist)
            .with_context(|| format!("Checklist index {} is out of range", selection.path.checklist))?;
        let container = E::container(checklist, &selection.path)?;
        let original = container[position_in(container, selection)?].clone();

        let mut mapping = IdMapping::new(request.number_of_copies);
        original.register(&mut mapping, &mut self.ids);
        if request.components.actions {
            if let Some(actions) = &checklist.action_requests {
                mapping.register_triggered_actions(actions, &mut self.ids);
            }
        }
        debug!("Allocated {} ids for {} {}", mapping.minted().count(), E::KIND, selection.id);

        Ok(Source { selection, original, mapping })
    }
}

/// Every generation of one source, each at its provisional order position
fn placed_copies<E: Entity>(source: &Source<'_, E>, request: &DuplicationRequest) -> Result<Vec<E>> {
    (0..request.number_of_copies)
        .map(|i| {
            let mut copy = copy_entity(&source.original, &Generation::new(&source.mapping, i, request))?;
            copy.set_order_position(placement::provisional_position(
                source.original.order_position(),
                request.placement.position,
                i,
            ));
            Ok(copy)
        })
        .collect()
}

fn checklist_mut<'c>(config: &'c mut Configuration, selection: &Selection) -> Result<&'c mut Checklist> {
    config
        .get_mut(selection.path.checklist)
        .with_context(|| format!("Checklist index {} is out of range", selection.path.checklist))
}

/// Append every generation's copies of the triggered actions to the checklist
fn attach_actions(checklist: &mut Checklist, mapping: &IdMapping, request: &DuplicationRequest) -> Result<()> {
    if !request.components.actions {
        return Ok(());
    }
    let Some(actions) = &checklist.action_requests else {
        return Ok(());
    };

    let mut copies = Vec::new();
    for generation in 0..mapping.copies() {
        copies.extend(copy_actions(actions, &Generation::new(mapping, generation, request))?);
    }

    if !copies.is_empty() {
        debug!("Attaching {} action copies to checklist {}", copies.len(), checklist.id);
        checklist.action_requests.get_or_insert_with(Vec::new).extend(copies);
    }
    Ok(())
}

fn check_request(request: &DuplicationRequest) {
    debug_assert!(
        (1..=MAX_COPIES).contains(&request.number_of_copies),
        "copy count {} outside 1..={}",
        request.number_of_copies,
        MAX_COPIES
    );
    debug_assert!(
        request.naming_pattern.template.contains(super::naming::NUMBER_PLACEHOLDER),
        "naming template without {{n}}"
    );
}

/// Duplicate one entity with the default id generator
pub fn duplicate_entity(
    config: &[Checklist],
    selection: &Selection,
    request: &DuplicationRequest,
) -> Result<Configuration> {
    DuplicationEngine::new().duplicate_entity(config, selection, request)
}

/// Duplicate several entities with the default id generator
pub fn duplicate_multiple_entities(
    config: &[Checklist],
    selections: &[Selection],
    request: &DuplicationRequest,
) -> Result<Configuration> {
    DuplicationEngine::new().duplicate_multiple_entities(config, selections, request)
}
