/// Integration tests for mes-dup
///
/// Tests are organized into logical groupings:
/// - fixtures: shared configurations and helpers
/// - scenarios: end-to-end duplication scenarios
/// - properties: invariants that hold for every request
/// - strategies: placement and multi-entity ordering
/// - references: remapping across payloads, rules, actions and toggles
/// - preview: the report shown before writing
/// - settings: stored defaults and request files
mod fixtures;
mod preview;
mod scenarios;
mod strategies;
