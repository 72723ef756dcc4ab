use mes_dup::engine::{DuplicationEngine, SequentialIdGenerator};
use mes_dup::model::{Configuration, Parameter, Stage, Task};
use serde_json::{Value, json};

pub const CHECKLIST: &str = "100000000000000000";
pub const STAGE_PREP: &str = "200000000000000001";
pub const STAGE_MIX: &str = "200000000000000002";
pub const STAGE_PACK: &str = "200000000000000003";
pub const TASK_CHECK: &str = "300000000000000001";
pub const TASK_ADD: &str = "300000000000000002";
pub const TASK_SEAL: &str = "300000000000000003";
pub const PARAM_TEMP: &str = "400000000000000001";
pub const PARAM_VOLUME: &str = "400000000000000002";
pub const PARAM_CONC: &str = "400000000000000003";
pub const PARAM_LOT: &str = "400000000000000004";
pub const AUTOMATION: &str = "500000000000000001";
pub const ACTION: &str = "600000000000000001";
pub const EFFECT: &str = "700000000000000001";

/// Three stages; "Mixing" carries every kind of reference surface
pub fn batch_record() -> Configuration {
    serde_json::from_value(batch_record_json()).unwrap()
}

pub fn batch_record_json() -> Value {
    json!([{
        "id": CHECKLIST,
        "name": "Batch Record",
        "code": "BR-1",
        "stageRequests": [
            {
                "id": STAGE_PREP,
                "name": "Preparation",
                "orderTree": 1,
                "taskRequests": [{
                    "id": TASK_CHECK,
                    "name": "Check Room",
                    "orderTree": 1,
                    "parameterRequests": [
                        {"id": PARAM_TEMP, "orderTree": 1, "type": "NUMBER", "label": "Temperature"}
                    ]
                }]
            },
            {
                "id": STAGE_MIX,
                "name": "Mixing",
                "orderTree": 2,
                "taskRequests": [{
                    "id": TASK_ADD,
                    "name": "Add Reagent",
                    "orderTree": 1,
                    "timed": false,
                    "parameterRequests": [
                        {
                            "id": PARAM_VOLUME,
                            "orderTree": 1,
                            "type": "NUMBER",
                            "label": "Volume",
                            "mandatory": true,
                            "rules": [{"id": "r1", "show": {"parameters": [PARAM_VOLUME], "tasks": [TASK_ADD]}}]
                        },
                        {
                            "id": PARAM_CONC,
                            "orderTree": 2,
                            "type": "CALCULATION",
                            "label": "Concentration",
                            "autoInitialize": {"parameterId": PARAM_TEMP, "relation": "EQUAL"},
                            "validations": format!(
                                r#"[{{"ruleId":"v1","parameterId":"{}","criteria":[{{"referencedParameterId":"{}"}}]}}]"#,
                                PARAM_VOLUME, PARAM_TEMP
                            ),
                            "data": {
                                "expression": "a / b",
                                "propertyFilters": [{"parameterId": PARAM_VOLUME}],
                                "propertyValidations": [{"parameterId": PARAM_TEMP}]
                            }
                        }
                    ],
                    "automationRequests": [{
                        "id": AUTOMATION,
                        "type": "PROCESS_BASED",
                        "actionDetails": {"parameterId": PARAM_VOLUME, "referencedParameterId": PARAM_TEMP},
                        "triggerDetails": format!(r#"{{"taskId":"{}"}}"#, TASK_ADD)
                    }]
                }]
            },
            {
                "id": STAGE_PACK,
                "name": "Packing",
                "orderTree": 3,
                "taskRequests": [{
                    "id": TASK_SEAL,
                    "name": "Seal",
                    "orderTree": 1,
                    "parameterRequests": [
                        {"id": PARAM_LOT, "orderTree": 1, "type": "SINGLE_LINE", "label": "Lot"}
                    ]
                }]
            }
        ],
        "actionRequests": [{
            "id": ACTION,
            "name": "Notify QA",
            "triggerEntityId": TASK_ADD,
            "effectRequests": [{
                "id": EFFECT,
                "type": "SQL_QUERY",
                "query": {
                    "root": {
                        "type": "root",
                        "children": [{
                            "type": "paragraph",
                            "children": [
                                {"type": "text", "text": "select ", "format": 0},
                                {
                                    "type": "custom-beautifulMention",
                                    "trigger": "@",
                                    "value": "Volume",
                                    "data": {"id": PARAM_VOLUME, "uuid": "u1", "entity": "parameter"}
                                },
                                {
                                    "type": "custom-beautifulMention",
                                    "trigger": "@",
                                    "value": "Temperature",
                                    "data": {"id": PARAM_TEMP, "uuid": "u2", "entity": "parameter"}
                                }
                            ]
                        }]
                    }
                },
                "apiEndpoint": null
            }]
        }]
    }])
}

/// A task "Inspect" with a parameter "Weight"
pub fn inspection() -> Configuration {
    serde_json::from_value(json!([{
        "id": CHECKLIST,
        "name": "Inspection",
        "stageRequests": [{
            "id": STAGE_PREP,
            "name": "Visual",
            "orderTree": 1,
            "taskRequests": [
                {
                    "id": TASK_CHECK,
                    "name": "Inspect",
                    "orderTree": 1,
                    "parameterRequests": [
                        {"id": PARAM_TEMP, "orderTree": 1, "type": "NUMBER", "label": "Weight"}
                    ]
                },
                {"id": TASK_SEAL, "name": "Sign off", "orderTree": 2, "parameterRequests": []}
            ]
        }]
    }]))
    .unwrap()
}

pub fn engine() -> DuplicationEngine<SequentialIdGenerator> {
    DuplicationEngine::with_generator(SequentialIdGenerator::default())
}

pub fn stages(config: &Configuration) -> &[Stage] {
    &config[0].stage_requests
}

pub fn stage_names(config: &Configuration) -> Vec<&str> {
    stages(config).iter().map(|stage| stage.name.as_str()).collect()
}

pub fn stage_named<'a>(config: &'a Configuration, name: &str) -> &'a Stage {
    stages(config)
        .iter()
        .find(|stage| stage.name == name)
        .unwrap_or_else(|| panic!("no stage named {}", name))
}

pub fn only_task(stage: &Stage) -> &Task {
    assert_eq!(stage.task_requests.len(), 1);
    &stage.task_requests[0]
}

pub fn parameter_labeled<'a>(task: &'a Task, label: &str) -> &'a Parameter {
    task.parameter_requests
        .iter()
        .find(|parameter| parameter.label.as_deref() == Some(label))
        .unwrap_or_else(|| panic!("no parameter labeled {}", label))
}

/// Every entity id in the configuration, duplicates included
pub fn all_ids(config: &Configuration) -> Vec<String> {
    let mut ids = Vec::new();
    for checklist in config {
        for stage in &checklist.stage_requests {
            ids.push(stage.id.clone());
            for task in &stage.task_requests {
                ids.push(task.id.clone());
                ids.extend(task.parameter_requests.iter().map(|parameter| parameter.id.clone()));
                ids.extend(task.automation_requests.iter().flatten().map(|automation| automation.id.clone()));
            }
        }
        for action in checklist.action_requests.iter().flatten() {
            ids.push(action.id.clone());
            ids.extend(action.effect_requests.iter().map(|effect| effect.id.clone()));
        }
    }
    ids
}

pub fn orders<T>(items: &[T], order: impl Fn(&T) -> i64) -> Vec<i64> {
    items.iter().map(order).collect()
}
