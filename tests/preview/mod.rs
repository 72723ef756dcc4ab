use crate::fixtures::*;
use mes_dup::engine::{Components, DuplicationRequest, OrderingStrategy, ReferenceStrategy};
use mes_dup::model::{Configuration, EntityKind, Selection};
use mes_dup::preview::{Severity, WarningKind, generate_preview, generate_single_preview};
use serde_json::json;

fn two_copies() -> DuplicationRequest {
    DuplicationRequest { number_of_copies: 2, ..DuplicationRequest::default() }
}

#[test]
fn test_stage_preview_counts_names_and_shifts() {
    let config = batch_record();
    let (preview, modified) =
        generate_single_preview(&mut engine(), &config, &Selection::stage(STAGE_MIX, 0, 1), &two_copies()).unwrap();

    let added = preview.summary.added;
    assert_eq!((added.stages, added.tasks, added.parameters), (2, 2, 4));
    assert_eq!((added.automations, added.rules), (2, 2));
    assert_eq!((added.actions, added.effects), (2, 2));
    assert_eq!(preview.summary.total_entities, 16);

    assert_eq!(preview.name_preview, vec!["Mixing 001", "Mixing 002"]);
    assert_eq!(preview.order_position_changes.len(), 1);
    let shift = &preview.order_position_changes[0];
    assert_eq!(shift.kind, EntityKind::Stage);
    assert_eq!(shift.name, "Packing");
    assert_eq!((shift.old_position, shift.new_position), (3, 5));

    assert_eq!(stage_names(&modified), vec!["Preparation", "Mixing", "Mixing 001", "Mixing 002", "Packing"]);
}

#[test]
fn test_preview_flags_external_references() {
    let config = batch_record();
    let (preview, _) =
        generate_single_preview(&mut engine(), &config, &Selection::stage(STAGE_MIX, 0, 1), &two_copies()).unwrap();

    let detected = preview
        .warnings
        .iter()
        .find(|warning| warning.title == "External References Detected")
        .unwrap();
    assert_eq!(detected.severity, Severity::Warning);
    assert_eq!(detected.affected_entities, vec![PARAM_CONC.to_string(), AUTOMATION.to_string()]);

    let kinds: Vec<_> = preview.warnings.iter().map(|warning| warning.kind).collect();
    assert_eq!(
        kinds,
        vec![WarningKind::OrderShift, WarningKind::ExternalReference, WarningKind::ExternalReference]
    );
}

#[test]
fn test_preview_reports_strategy_conflicts_and_exclusions() {
    let config = batch_record();
    let mut request = DuplicationRequest {
        number_of_copies: 1,
        reference_strategy: ReferenceStrategy::Remove,
        components: Components { media: false, ..Components::default() },
        ..DuplicationRequest::default()
    };
    request.naming_pattern.template = "Packing{n}".to_string();
    request.naming_pattern.zero_padding = false;
    request.naming_pattern.starting_number = 0;

    let (preview, _) =
        generate_single_preview(&mut engine(), &config, &Selection::stage(STAGE_PREP, 0, 0), &request).unwrap();

    assert_eq!(preview.name_preview, vec!["Packing0"]);
    let titles: Vec<_> = preview.warnings.iter().map(|warning| warning.title.as_str()).collect();
    assert!(titles.contains(&"External References Removed"));
    assert!(titles.contains(&"Components Excluded"));
    assert!(!titles.contains(&"Name Conflicts"));
}

#[test]
fn test_preview_detects_name_conflicts() {
    let mut raw = batch_record_json();
    raw[0]["stageRequests"][2]["name"] = json!("Mixing 001");
    let config: Configuration = serde_json::from_value(raw).unwrap();

    let (preview, _) = generate_single_preview(
        &mut engine(),
        &config,
        &Selection::stage(STAGE_MIX, 0, 1),
        &DuplicationRequest::default(),
    )
    .unwrap();

    let conflict = preview.warnings.iter().find(|warning| warning.kind == WarningKind::NameConflict).unwrap();
    assert!(conflict.message.contains("Mixing 001"));
}

#[test]
fn test_multi_preview_names_follow_ordering_strategy() {
    let config = batch_record();
    let selections = [Selection::stage(STAGE_PACK, 0, 2), Selection::stage(STAGE_PREP, 0, 0)];
    let request = DuplicationRequest { ordering_strategy: OrderingStrategy::Sequential, ..two_copies() };

    let (preview, modified) = generate_preview(&mut engine(), &config, &selections, &request).unwrap();

    assert_eq!(
        preview.name_preview,
        vec!["Preparation 001", "Preparation 002", "Packing 001", "Packing 002"]
    );
    assert_eq!(preview.summary.added.stages, 4);
    assert_eq!(stages(&modified).len(), 7);
}

#[test]
fn test_preview_serializes_in_form_shape() {
    let config = batch_record();
    let (preview, _) =
        generate_single_preview(&mut engine(), &config, &Selection::stage(STAGE_MIX, 0, 1), &two_copies()).unwrap();
    let value = serde_json::to_value(&preview).unwrap();

    assert_eq!(value["summary"]["stages"], json!(2));
    assert_eq!(value["summary"]["totalEntities"], json!(16));
    assert_eq!(value["namePreview"], json!(["Mixing 001", "Mixing 002"]));
    assert_eq!(value["orderPositionChanges"][0]["oldPosition"], json!(3));
    assert_eq!(value["warnings"][0]["type"], json!("order_shift"));
    assert_eq!(value["warnings"][0]["severity"], json!("info"));
    assert!(value["warnings"][2].get("affectedEntities").is_none());
}
