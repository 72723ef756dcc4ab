pub mod duplicator;
pub mod ids;
pub mod mapping;
pub mod naming;
pub mod orchestrator;
pub mod placement;
pub mod remap;
pub mod request;

pub use ids::{IdGenerator, SequentialIdGenerator, TimestampIdGenerator};
pub use mapping::{IdMapping, MappedKind};
pub use orchestrator::{DuplicationEngine, duplicate_entity, duplicate_multiple_entities};
pub use request::{
    ChildNaming, ChildNamingRule, Components, DuplicationRequest, GroupingStrategy, NamingPattern, OrderingStrategy,
    Placement, Position, ReferenceStrategy,
};
