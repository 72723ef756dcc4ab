use crate::fixtures::*;
use mes_dup::engine::{
    ChildNamingRule, DuplicationRequest, GroupingStrategy, NamingPattern, OrderingStrategy, ReferenceStrategy,
};
use mes_dup::model::Selection;
use serde_json::{Value, json};

fn copies(n: usize) -> DuplicationRequest {
    DuplicationRequest { number_of_copies: n, ..DuplicationRequest::default() }
}

#[test]
fn test_stage_copies_follow_the_original_and_shift_later_stages() {
    let config = batch_record();
    let result = engine()
        .duplicate_entity(&config, &Selection::stage(STAGE_MIX, 0, 1), &copies(2))
        .unwrap();

    assert_eq!(stage_names(&result), vec!["Preparation", "Mixing", "Mixing 001", "Mixing 002", "Packing"]);
    assert_eq!(orders(stages(&result), |stage| stage.order_tree), vec![1, 2, 3, 4, 5]);
    assert_eq!(stage_named(&result, "Mixing").id, STAGE_MIX);
    assert_eq!(stage_named(&result, "Packing").order_tree, 5);
}

#[test]
fn test_each_stage_copy_points_its_rules_at_itself() {
    let config = batch_record();
    let result = engine()
        .duplicate_entity(&config, &Selection::stage(STAGE_MIX, 0, 1), &copies(2))
        .unwrap();

    let mut seen = Vec::new();
    for name in ["Mixing 001", "Mixing 002"] {
        let task = only_task(stage_named(&result, name));
        let volume = parameter_labeled(task, "Volume");
        let show = volume.rules.as_ref().unwrap()[0].show.as_ref().unwrap();

        assert_eq!(show.parameters.as_deref(), Some(&[volume.id.clone()][..]));
        assert_eq!(show.tasks.as_deref(), Some(&[task.id.clone()][..]));
        seen.push(volume.id.clone());
    }
    assert_ne!(seen[0], seen[1]);
    assert!(!seen.contains(&PARAM_VOLUME.to_string()));
}

#[test]
fn test_parameter_copy_drops_external_auto_initialize_on_remove() {
    let config = batch_record();
    let request = DuplicationRequest { reference_strategy: ReferenceStrategy::Remove, ..copies(1) };
    let selection = Selection::parameter(PARAM_CONC, 0, 1, 0, Some(1));
    let result = engine().duplicate_entity(&config, &selection, &request).unwrap();

    let task = only_task(stage_named(&result, "Mixing"));
    let labels: Vec<_> = task.parameter_requests.iter().map(|p| p.display_label()).collect();
    assert_eq!(labels, vec!["Volume", "Concentration", "Concentration 001"]);

    let copy = parameter_labeled(task, "Concentration 001");
    assert!(copy.auto_initialize.is_none());
    let serialized = serde_json::to_value(copy).unwrap();
    assert!(serialized.get("autoInitialize").is_none());

    // Both validation references point outside the copy, so both go
    let validations: Value = serde_json::from_str(copy.validations.as_ref().unwrap().as_str().unwrap()).unwrap();
    assert_eq!(validations, json!([{"ruleId": "v1", "criteria": [{}]}]));
}

#[test]
fn test_parameter_copy_keeps_external_auto_initialize_on_keep() {
    let config = batch_record();
    let selection = Selection::parameter(PARAM_CONC, 0, 1, 0, Some(1));
    let result = engine().duplicate_entity(&config, &selection, &copies(1)).unwrap();

    let task = only_task(stage_named(&result, "Mixing"));
    let copy = parameter_labeled(task, "Concentration 001");
    let auto_initialize = copy.auto_initialize.clone().unwrap().unwrap();
    assert_eq!(auto_initialize.parameter_id, PARAM_TEMP);
    assert_eq!(auto_initialize.extra["relation"], json!("EQUAL"));
}

#[test]
fn test_interleaved_multi_stage_duplication() {
    let config = batch_record();
    let selections = [
        Selection::stage(STAGE_PREP, 0, 0),
        Selection::stage(STAGE_MIX, 0, 1),
        Selection::stage(STAGE_PACK, 0, 2),
    ];
    let result = engine()
        .duplicate_multiple_entities(&config, &selections, &copies(2))
        .unwrap();

    assert_eq!(
        stage_names(&result),
        vec![
            "Preparation",
            "Mixing",
            "Packing",
            "Preparation 001",
            "Mixing 001",
            "Packing 001",
            "Preparation 002",
            "Mixing 002",
            "Packing 002",
        ]
    );
    assert_eq!(orders(stages(&result), |stage| stage.order_tree), (1..=9).collect::<Vec<_>>());
}

#[test]
fn test_sequential_grouped_multi_stage_duplication() {
    let config = batch_record();
    let selections = [
        Selection::stage(STAGE_PREP, 0, 0),
        Selection::stage(STAGE_MIX, 0, 1),
        Selection::stage(STAGE_PACK, 0, 2),
    ];
    let request = DuplicationRequest {
        ordering_strategy: OrderingStrategy::Sequential,
        grouping_strategy: GroupingStrategy::Grouped,
        ..copies(2)
    };
    let result = engine().duplicate_multiple_entities(&config, &selections, &request).unwrap();

    assert_eq!(
        stage_names(&result),
        vec![
            "Preparation",
            "Mixing",
            "Packing",
            "Preparation 001",
            "Preparation 002",
            "Mixing 001",
            "Mixing 002",
            "Packing 001",
            "Packing 002",
        ]
    );
    assert_eq!(orders(stages(&result), |stage| stage.order_tree), (1..=9).collect::<Vec<_>>());
}

#[test]
fn test_task_copy_cascades_suffix_to_parameters() {
    let config = inspection();
    let mut request = copies(2);
    request.naming_pattern = NamingPattern {
        template: "{base_name} {n}".to_string(),
        zero_padding: false,
        ..NamingPattern::default()
    };
    request.child_naming.parameters = ChildNamingRule {
        apply_inherited_suffix: true,
        suffix_prefix: "Lot".to_string(),
    };

    let result = engine()
        .duplicate_entity(&config, &Selection::task(TASK_CHECK, 0, 0, 0), &request)
        .unwrap();

    let tasks = &stages(&result)[0].task_requests;
    let names: Vec<_> = tasks.iter().map(|task| task.name.as_str()).collect();
    assert_eq!(names, vec!["Inspect", "Inspect 1", "Inspect 2", "Sign off"]);
    assert_eq!(orders(tasks, |task| task.order_tree), vec![1, 2, 3, 4]);

    let second = &tasks[2];
    assert_eq!(second.parameter_requests[0].label.as_deref(), Some("Weight Lot2"));
    assert_eq!(tasks[0].parameter_requests[0].label.as_deref(), Some("Weight"));
}

#[test]
fn test_stage_copy_cascades_suffix_to_tasks_only_when_asked() {
    let config = batch_record();
    let mut request = copies(1);
    request.child_naming.tasks = ChildNamingRule { apply_inherited_suffix: true, suffix_prefix: String::new() };

    let result = engine()
        .duplicate_entity(&config, &Selection::stage(STAGE_MIX, 0, 1), &request)
        .unwrap();

    let task = only_task(stage_named(&result, "Mixing 001"));
    assert_eq!(task.name, "Add Reagent001");
    assert_eq!(parameter_labeled(task, "Volume").order_tree, 1);
}

#[test]
fn test_unknown_fields_survive_duplication() {
    let config = batch_record();
    let result = engine()
        .duplicate_entity(&config, &Selection::stage(STAGE_MIX, 0, 1), &copies(1))
        .unwrap();

    assert_eq!(result[0].extra["code"], json!("BR-1"));
    let task = only_task(stage_named(&result, "Mixing 001"));
    assert_eq!(task.extra["timed"], json!(false));
    assert_eq!(parameter_labeled(task, "Volume").extra["mandatory"], json!(true));
}
