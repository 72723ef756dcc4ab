use crate::fixtures::*;
use mes_dup::engine::{DuplicationRequest, GroupingStrategy, OrderingStrategy, Placement, Position};
use mes_dup::model::{Configuration, Selection};
use serde_json::json;

fn placed(position: Position, auto_shift: bool, copies: usize) -> DuplicationRequest {
    DuplicationRequest {
        number_of_copies: copies,
        placement: Placement { position, auto_shift },
        ..DuplicationRequest::default()
    }
}

/// One stage holding four tasks A..D at positions 1..4
fn four_tasks() -> Configuration {
    let tasks: Vec<_> = ["A", "B", "C", "D"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "id": format!("30000000000000000{}", i + 1),
                "name": name,
                "orderTree": i + 1,
                "parameterRequests": []
            })
        })
        .collect();
    serde_json::from_value(json!([{
        "id": CHECKLIST,
        "name": "Line clearance",
        "stageRequests": [{"id": STAGE_PREP, "name": "Clearance", "orderTree": 1, "taskRequests": tasks}]
    }]))
    .unwrap()
}

fn task_names(config: &Configuration) -> Vec<&str> {
    stages(config)[0].task_requests.iter().map(|task| task.name.as_str()).collect()
}

#[test]
fn test_before_places_copies_ahead_of_the_original() {
    let config = batch_record();
    let result = engine()
        .duplicate_entity(&config, &Selection::stage(STAGE_MIX, 0, 1), &placed(Position::Before, true, 2))
        .unwrap();

    assert_eq!(stage_names(&result), vec!["Preparation", "Mixing 001", "Mixing 002", "Mixing", "Packing"]);
    assert_eq!(orders(stages(&result), |stage| stage.order_tree), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_start_and_end_placement() {
    let config = batch_record();
    let selection = Selection::stage(STAGE_MIX, 0, 1);

    let start = engine().duplicate_entity(&config, &selection, &placed(Position::Start, true, 1)).unwrap();
    assert_eq!(stage_names(&start), vec!["Mixing 001", "Preparation", "Mixing", "Packing"]);

    let end = engine().duplicate_entity(&config, &selection, &placed(Position::End, true, 2)).unwrap();
    assert_eq!(stage_names(&end), vec!["Preparation", "Mixing", "Packing", "Mixing 001", "Mixing 002"]);
    assert_eq!(orders(stages(&end), |stage| stage.order_tree), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_without_auto_shift_only_copies_get_positions() {
    let config = batch_record();
    let selection = Selection::stage(STAGE_MIX, 0, 1);

    let after = engine().duplicate_entity(&config, &selection, &placed(Position::After, false, 2)).unwrap();
    assert_eq!(orders(stages(&after), |stage| stage.order_tree), vec![1, 2, 3, 4, 3]);

    let end = engine().duplicate_entity(&config, &selection, &placed(Position::End, false, 2)).unwrap();
    assert_eq!(orders(stages(&end), |stage| stage.order_tree), vec![1, 2, 3, 999_999, 1_000_000]);

    let start = engine().duplicate_entity(&config, &selection, &placed(Position::Start, false, 2)).unwrap();
    assert_eq!(orders(stages(&start), |stage| stage.order_tree), vec![1, 2, 1, 2, 3]);
}

#[test]
fn test_sequential_relative_keeps_copies_next_to_each_original() {
    let config = four_tasks();
    let selections = [
        Selection::task("300000000000000001", 0, 0, 0),
        Selection::task("300000000000000003", 0, 0, 2),
    ];
    let request = DuplicationRequest {
        number_of_copies: 2,
        ordering_strategy: OrderingStrategy::Sequential,
        grouping_strategy: GroupingStrategy::Relative,
        ..DuplicationRequest::default()
    };
    let result = engine().duplicate_multiple_entities(&config, &selections, &request).unwrap();

    assert_eq!(task_names(&result), vec!["A", "A 001", "A 002", "B", "C", "C 001", "C 002", "D"]);
    assert_eq!(
        orders(&stages(&result)[0].task_requests, |task| task.order_tree),
        (1..=8).collect::<Vec<_>>()
    );
}

fn sequential_relative(position: Position, auto_shift: bool, copies: usize) -> DuplicationRequest {
    DuplicationRequest {
        ordering_strategy: OrderingStrategy::Sequential,
        grouping_strategy: GroupingStrategy::Relative,
        ..placed(position, auto_shift, copies)
    }
}

fn tasks_a_and_c() -> [Selection; 2] {
    [
        Selection::task("300000000000000001", 0, 0, 0),
        Selection::task("300000000000000003", 0, 0, 2),
    ]
}

#[test]
fn test_sequential_relative_honours_before() {
    let config = four_tasks();
    let result = engine()
        .duplicate_multiple_entities(&config, &tasks_a_and_c(), &sequential_relative(Position::Before, true, 1))
        .unwrap();

    assert_eq!(task_names(&result), vec!["A 001", "A", "B", "C 001", "C", "D"]);
    assert_eq!(
        orders(&stages(&result)[0].task_requests, |task| task.order_tree),
        (1..=6).collect::<Vec<_>>()
    );
}

#[test]
fn test_sequential_relative_without_auto_shift_uses_provisional_positions() {
    let config = four_tasks();
    let result = engine()
        .duplicate_multiple_entities(&config, &tasks_a_and_c(), &sequential_relative(Position::After, false, 2))
        .unwrap();

    assert_eq!(task_names(&result), vec!["A", "A 001", "A 002", "B", "C", "C 001", "C 002", "D"]);
    assert_eq!(
        orders(&stages(&result)[0].task_requests, |task| task.order_tree),
        vec![1, 2, 3, 2, 3, 4, 5, 4]
    );
}

#[test]
fn test_grouped_block_lands_after_the_last_selected_entity() {
    let config = four_tasks();
    // Selection order does not matter; originals are sorted by position
    let selections = [
        Selection::task("300000000000000003", 0, 0, 2),
        Selection::task("300000000000000001", 0, 0, 0),
    ];
    let request = DuplicationRequest {
        number_of_copies: 2,
        ordering_strategy: OrderingStrategy::Sequential,
        grouping_strategy: GroupingStrategy::Grouped,
        ..DuplicationRequest::default()
    };
    let result = engine().duplicate_multiple_entities(&config, &selections, &request).unwrap();

    assert_eq!(task_names(&result), vec!["A", "B", "C", "A 001", "A 002", "C 001", "C 002", "D"]);
}

#[test]
fn test_interleaved_ignores_grouping() {
    let config = four_tasks();
    let selections = [
        Selection::task("300000000000000001", 0, 0, 0),
        Selection::task("300000000000000002", 0, 0, 1),
    ];
    let request = DuplicationRequest {
        number_of_copies: 2,
        ordering_strategy: OrderingStrategy::Interleaved,
        grouping_strategy: GroupingStrategy::Relative,
        ..DuplicationRequest::default()
    };
    let result = engine().duplicate_multiple_entities(&config, &selections, &request).unwrap();

    assert_eq!(task_names(&result), vec!["A", "B", "A 001", "B 001", "A 002", "B 002", "C", "D"]);
}

#[test]
fn test_stale_index_hint_falls_back_to_search() {
    let config = batch_record();
    let stale = Selection::stage(STAGE_PACK, 0, 0);
    let result = engine().duplicate_entity(&config, &stale, &placed(Position::After, true, 1)).unwrap();

    assert_eq!(stage_names(&result), vec!["Preparation", "Mixing", "Packing", "Packing 001"]);
}

#[test]
fn test_invalid_selections_are_rejected() {
    let config = batch_record();
    let request = DuplicationRequest::default();

    assert!(engine().duplicate_multiple_entities(&config, &[], &request).is_err());

    let mixed = [Selection::stage(STAGE_MIX, 0, 1), Selection::task(TASK_ADD, 0, 1, 0)];
    assert!(engine().duplicate_multiple_entities(&config, &mixed, &request).is_err());

    let missing = Selection::task("399999999999999999", 0, 1, 0);
    let error = engine().duplicate_entity(&config, &missing, &request).unwrap_err();
    assert!(error.to_string().contains("399999999999999999"));

    let out_of_range = Selection::stage(STAGE_MIX, 4, 1);
    assert!(engine().duplicate_entity(&config, &out_of_range, &request).is_err());
}
