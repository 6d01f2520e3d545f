use super::*;
use crate::ast::{
    ActionCall, ActionDefinition, AssetKind, BinaryOp, DefaultImportKeyword, ImportStatement,
    Parameter, Scope, SequenceItem, TimeExpression, TimeOp, TimeRange, TypeAnnotation,
};
use crate::diagnostics::{actions, inference, operations, timeline};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;

fn compiler() -> Compiler {
    Compiler::new(Arc::new(
        OperationRegistry::bundled().expect("bundled registry parses"),
    ))
}

fn fade_in() -> ActionDefinition {
    ActionDefinition::regular(
        "fadeIn",
        vec![Parameter::new("selector"), Parameter::new("duration")],
        vec![
            Statement::call("selectElement", vec![Expression::reference("selector")]),
            Statement::call(
                "animate",
                vec![
                    Expression::object([("opacity", Expression::number(1.0))]),
                    Expression::reference("duration"),
                ],
            ),
        ],
    )
}

fn timed(start: f64, end: f64, name: &str, arguments: Vec<Expression>) -> TimelineEvent {
    TimelineEvent::Timed {
        span: Span::default(),
        range: TimeRange::new(TimeExpression::seconds(start), TimeExpression::seconds(end)),
        action: EventAction::Call(ActionCall::new(name, arguments)),
    }
}

fn timeline(events: Vec<TimelineEvent>) -> Timeline {
    Timeline {
        span: Span::default(),
        name: "main".to_string(),
        provider: "video".to_string(),
        events,
    }
}

fn program(actions: Vec<ActionDefinition>, timelines: Vec<Timeline>) -> Program {
    Program {
        actions,
        timelines,
        ..Program::default()
    }
}

fn codes(bag: &DiagnosticBag) -> Vec<&str> {
    bag.diagnostics().iter().map(|d| d.code.as_str()).collect()
}

fn to_value(compiled: &CompiledProgram) -> serde_json::Value {
    serde_json::to_value(compiled).expect("compiled program serializes")
}

// ---------------------------------------------------------------------------
// Checking
// ---------------------------------------------------------------------------

#[test]
fn test_valid_document_has_no_diagnostics() {
    let analysis = compiler().check(&program(
        vec![fade_in()],
        vec![timeline(vec![timed(
            0.0,
            5.0,
            "fadeIn",
            vec![Expression::string("#box"), Expression::number(1000.0)],
        )])],
    ));

    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
    let fade = &analysis.parameter_types["fadeIn"];
    assert_eq!(fade["selector"], EligianType::String);
    assert_eq!(fade["duration"], EligianType::Number);
    assert!(analysis.types.action("fadeIn").is_some());
}

#[test]
fn test_duplicate_action_points_at_first_definition() {
    let mut first = fade_in();
    first.span = Span::new(PathBuf::from("doc.eligian"), 0, 40, 1, 1, 3, 2);
    let mut second = fade_in();
    second.span = Span::new(PathBuf::from("doc.eligian"), 60, 100, 5, 1, 7, 2);

    let analysis = compiler().check(&program(vec![first, second], vec![]));

    assert_eq!(codes(&analysis.diagnostics), vec![actions::DUPLICATE_ACTION]);
    let diagnostic = &analysis.diagnostics.diagnostics()[0];
    assert_eq!(diagnostic.message, "Duplicate action \"fadeIn\"");
    assert_eq!(diagnostic.span.start_line, 5);
    assert_eq!(diagnostic.notes[0].span.as_ref().map(|s| s.start_line), Some(1));
}

#[test]
fn test_type_conflict_is_reported_and_parameter_falls_back() {
    let action = ActionDefinition::regular(
        "broken",
        vec![Parameter::new("value")],
        vec![
            Statement::call("addClass", vec![Expression::reference("value")]),
            Statement::call("wait", vec![Expression::reference("value")]),
        ],
    );

    let analysis = compiler().check(&program(vec![action], vec![]));

    assert_eq!(codes(&analysis.diagnostics), vec![inference::TYPE_CONFLICT]);
    assert_eq!(
        analysis.parameter_types["broken"]["value"],
        EligianType::Unknown
    );
}

#[test]
fn test_annotation_survives_failed_inference() {
    let action = ActionDefinition::regular(
        "broken",
        vec![
            Parameter::typed("label", TypeAnnotation::String),
            Parameter::new("value"),
        ],
        vec![
            Statement::call("addClass", vec![Expression::reference("value")]),
            Statement::call("wait", vec![Expression::reference("value")]),
        ],
    );

    let analysis = compiler().check(&program(vec![action], vec![]));
    let types = &analysis.parameter_types["broken"];
    assert_eq!(types["label"], EligianType::String);
    assert_eq!(types["value"], EligianType::Unknown);
}

#[test]
fn test_operation_errors_inside_action_bodies() {
    let action = ActionDefinition::regular(
        "typo",
        vec![],
        vec![Statement::If {
            span: Span::default(),
            condition: Expression::boolean(true),
            then_branch: vec![Statement::call("adClass", vec![Expression::string("x")])],
            else_branch: Some(vec![Statement::call("wait", vec![])]),
        }],
    );

    let analysis = compiler().check(&program(vec![action], vec![]));
    assert_eq!(
        codes(&analysis.diagnostics),
        vec![operations::UNKNOWN_OPERATION, operations::PARAMETER_COUNT]
    );
}

#[test]
fn test_action_calls_are_checked_structurally() {
    let caller = ActionDefinition::regular(
        "caller",
        vec![],
        vec![
            Statement::call("fadeIn", vec![Expression::string("#box")]),
            Statement::call(
                "fadeIn",
                vec![Expression::number(1.0), Expression::number(2.0)],
            ),
        ],
    );

    let analysis = compiler().check(&program(vec![fade_in(), caller], vec![]));
    assert_eq!(
        codes(&analysis.diagnostics),
        vec![actions::ACTION_ARGUMENT_COUNT, actions::ACTION_ARGUMENT_TYPE]
    );
}

#[test]
fn test_loop_item_shadows_parameter() {
    // `selector` inside the loop is the item, not the string parameter
    let action = ActionDefinition::regular(
        "each",
        vec![Parameter::typed("selector", TypeAnnotation::String)],
        vec![Statement::For {
            span: Span::default(),
            item: "selector".to_string(),
            collection: Expression::array(vec![Expression::number(1.0)]),
            body: vec![Statement::call("wait", vec![Expression::reference("selector")])],
        }],
    );

    let analysis = compiler().check(&program(vec![action], vec![]));
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
}

#[test]
fn test_timeline_range_errors() {
    let divided = TimelineEvent::Timed {
        span: Span::default(),
        range: TimeRange::new(
            TimeExpression::binary(
                TimeOp::Div,
                TimeExpression::seconds(1.0),
                TimeExpression::seconds(0.0),
            ),
            TimeExpression::seconds(2.0),
        ),
        action: EventAction::Inline {
            start: vec![],
            end: vec![],
        },
    };
    let backwards = timed(5.0, 2.0, "wait", vec![Expression::number(10.0)]);

    let analysis = compiler().check(&program(vec![], vec![timeline(vec![divided, backwards])]));

    assert_eq!(
        codes(&analysis.diagnostics),
        vec![timeline::INVALID_TIME_RANGE, timeline::INVALID_TIME_RANGE]
    );
    let messages: Vec<&str> = analysis
        .diagnostics
        .diagnostics()
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Invalid time range in timeline \"main\": a time expression cannot be evaluated",
            "Invalid time range in timeline \"main\": starts at 5s but ends at 2s",
        ]
    );
}

#[test]
fn test_stagger_passes_item_as_first_argument() {
    let highlight = ActionDefinition::regular(
        "highlight",
        vec![Parameter::new("item"), Parameter::new("className")],
        vec![Statement::call("addClass", vec![Expression::reference("className")])],
    );
    let stagger = TimelineEvent::Stagger {
        span: Span::default(),
        delay: TimeExpression::millis(200.0),
        items: Expression::array(vec![Expression::string("#a"), Expression::string("#b")]),
        action: ActionCall::new("highlight", vec![Expression::string("on")]),
        duration: TimeExpression::seconds(1.0),
    };

    let analysis = compiler().check(&program(vec![highlight], vec![timeline(vec![stagger])]));
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
}

#[test]
fn test_infer_keeps_per_action_results() {
    let broken = ActionDefinition::regular(
        "broken",
        vec![Parameter::new("value")],
        vec![
            Statement::call("addClass", vec![Expression::reference("value")]),
            Statement::call("wait", vec![Expression::reference("value")]),
        ],
    );

    let results = compiler().infer(&program(vec![fade_in(), broken], vec![]));
    assert_eq!(results.len(), 2);
    assert!(results[0].1.is_ok());
    assert_eq!(results[1].0, "broken");
    assert!(results[1].1.is_err());
}

// ---------------------------------------------------------------------------
// Lowering
// ---------------------------------------------------------------------------

#[test]
fn test_compile_refuses_documents_with_errors() {
    let action = ActionDefinition::regular(
        "typo",
        vec![],
        vec![Statement::call("adClass", vec![Expression::string("x")])],
    );
    let bag = compiler()
        .compile(&program(vec![action], vec![]))
        .expect_err("unknown operation must fail compilation");
    assert_eq!(codes(&bag), vec![operations::UNKNOWN_OPERATION]);
}

#[test]
fn test_lowers_action_with_parameter_references() {
    let compiled = compiler()
        .compile(&program(vec![fade_in()], vec![]))
        .expect("document compiles");

    insta::assert_json_snapshot!(compiled.actions[0], @r###"
    {
      "name": "fadeIn",
      "startOperations": [
        {
          "systemName": "selectElement",
          "operationData": {
            "selector": "operationdata.selector",
            "useSelectedElementAsRoot": false
          }
        },
        {
          "systemName": "animate",
          "operationData": {
            "animationProperties": {
              "opacity": 1
            },
            "animationDuration": "operationdata.duration",
            "animationEasing": "swing"
          }
        }
      ]
    }
    "###);
}

#[test]
fn test_lowers_control_flow() {
    let action = ActionDefinition::regular(
        "flow",
        vec![Parameter::typed("items", TypeAnnotation::Array)],
        vec![
            Statement::VariableDeclaration {
                span: Span::default(),
                name: "count".to_string(),
                value: Expression::binary(
                    BinaryOp::Mul,
                    Expression::number(2.0),
                    Expression::number(3.0),
                ),
            },
            Statement::If {
                span: Span::default(),
                condition: Expression::binary(
                    BinaryOp::Gt,
                    Expression::VariableReference {
                        span: Span::default(),
                        name: "count".to_string(),
                    },
                    Expression::number(5.0),
                ),
                then_branch: vec![Statement::call("log", vec![])],
                else_branch: Some(vec![Statement::call("wait", vec![Expression::number(1.0)])]),
            },
            Statement::For {
                span: Span::default(),
                item: "item".to_string(),
                collection: Expression::reference("items"),
                body: vec![Statement::call(
                    "selectElement",
                    vec![Expression::reference("item")],
                )],
            },
        ],
    );

    let compiled = compiler()
        .compile(&program(vec![action], vec![]))
        .expect("document compiles");
    let ops = &to_value(&compiled)["actions"][0]["startOperations"];

    assert_eq!(
        ops,
        &json!([
            { "systemName": "setVariable", "operationData": { "name": "count", "value": 6 } },
            { "systemName": "when", "operationData": { "expression": "scope.variables.count > 5" } },
            { "systemName": "log", "operationData": {} },
            { "systemName": "otherwise", "operationData": {} },
            { "systemName": "wait", "operationData": { "milliseconds": 1 } },
            { "systemName": "endWhen", "operationData": {} },
            { "systemName": "forEach", "operationData": { "collection": "operationdata.items" } },
            {
                "systemName": "selectElement",
                "operationData": { "selector": "scope.currentItem", "useSelectedElementAsRoot": false }
            },
            { "systemName": "endForEach", "operationData": {} }
        ])
    );
}

#[test]
fn test_lowers_timeline_events() {
    let reveal = ActionDefinition::endable(
        "reveal",
        vec![Parameter::new("selector")],
        vec![Statement::call("selectElement", vec![Expression::reference("selector")])],
        vec![Statement::call("removeElement", vec![])],
    );
    let sequence = TimelineEvent::Sequence {
        span: Span::default(),
        items: vec![
            SequenceItem {
                action: ActionCall::new("reveal", vec![Expression::string("#a")]),
                duration: TimeExpression::seconds(2.0),
            },
            SequenceItem {
                action: ActionCall::new("reveal", vec![Expression::string("#b")]),
                duration: TimeExpression::millis(1500.0),
            },
        ],
    };

    let compiled = compiler()
        .compile(&program(vec![reveal], vec![timeline(vec![sequence])]))
        .expect("document compiles");
    let events = &compiled.timelines[0].events;

    let ranges: Vec<(f64, f64)> = events.iter().map(|e| (e.start, e.end)).collect();
    assert_eq!(ranges, vec![(0.0, 2.0), (2.0, 3.5)]);

    let names: Vec<&str> = events[0]
        .start_operations
        .iter()
        .chain(&events[0].end_operations)
        .map(|op| op.system_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["requestAction", "startAction", "requestAction", "endAction"]
    );
    assert_eq!(
        serde_json::to_value(&events[1].start_operations[1]).expect("serializes"),
        json!({
            "systemName": "startAction",
            "operationData": { "actionOperationData": { "selector": "#b" } }
        })
    );
}

#[test]
fn test_lowers_stagger_per_item() {
    let highlight = ActionDefinition::regular(
        "highlight",
        vec![Parameter::new("item"), Parameter::new("className")],
        vec![Statement::call("addClass", vec![Expression::reference("className")])],
    );
    let stagger = TimelineEvent::Stagger {
        span: Span::default(),
        delay: TimeExpression::millis(250.0),
        items: Expression::array(vec![
            Expression::string("#a"),
            Expression::string("#b"),
            Expression::string("#c"),
        ]),
        action: ActionCall::new("highlight", vec![Expression::string("on")]),
        duration: TimeExpression::seconds(1.0),
    };

    let compiled = compiler()
        .compile(&program(vec![highlight], vec![timeline(vec![stagger])]))
        .expect("document compiles");
    let events = &compiled.timelines[0].events;

    let ranges: Vec<(f64, f64)> = events.iter().map(|e| (e.start, e.end)).collect();
    assert_eq!(ranges, vec![(0.0, 1.0), (0.25, 1.25), (0.5, 1.5)]);
    assert_eq!(
        serde_json::to_value(&events[2].start_operations[1].operation_data).expect("serializes"),
        json!({ "actionOperationData": { "item": "#c", "className": "on" } })
    );
}

#[test]
fn test_lowers_imports_and_inline_events() {
    let mut document = program(
        vec![],
        vec![timeline(vec![TimelineEvent::Timed {
            span: Span::default(),
            range: TimeRange::new(TimeExpression::seconds(1.0), TimeExpression::seconds(4.0)),
            action: EventAction::Inline {
                start: vec![Statement::call("addClass", vec![Expression::string("on")])],
                end: vec![Statement::call("removeClass", vec![Expression::string("on")])],
            },
        }])],
    );
    document.imports = vec![
        ImportStatement::Default {
            span: Span::default(),
            keyword: DefaultImportKeyword::Layout,
            path: "./layout.html".to_string(),
        },
        ImportStatement::Named {
            span: Span::default(),
            name: "intro".to_string(),
            path: "./intro.mp4".to_string(),
            as_type: None,
        },
        ImportStatement::Named {
            span: Span::default(),
            name: "data".to_string(),
            path: "./data.txt".to_string(),
            as_type: Some(AssetKind::Json),
        },
    ];

    let compiled = compiler().compile(&document).expect("document compiles");
    let value = to_value(&compiled);

    assert_eq!(
        value["imports"],
        json!([
            { "name": "layout", "path": "./layout.html", "kind": "html" },
            { "name": "intro", "path": "./intro.mp4", "kind": "media" },
            { "name": "data", "path": "./data.txt", "kind": "json" }
        ])
    );
    assert_eq!(
        value["timelines"][0]["events"][0],
        json!({
            "start": 1.0,
            "end": 4.0,
            "startOperations": [{ "systemName": "addClass", "operationData": { "className": "on" } }],
            "endOperations": [{ "systemName": "removeClass", "operationData": { "className": "on" } }]
        })
    );
}

#[test]
fn test_check_reports_what_lowering_cannot_map() {
    let undeclared = ActionDefinition::regular(
        "lost",
        vec![],
        vec![Statement::call("selectElement", vec![Expression::reference("nope")])],
    );
    let runtime_operand = ActionDefinition::regular(
        "joined",
        vec![],
        vec![Statement::call(
            "selectElement",
            vec![Expression::binary(
                BinaryOp::Add,
                Expression::property_chain(Scope::Scope, ["x"]),
                Expression::string("y"),
            )],
        )],
    );

    for action in [undeclared, runtime_operand] {
        let document = program(vec![action], vec![]);
        let analysis = compiler().check(&document);
        assert_eq!(codes(&analysis.diagnostics), vec!["MAPPING_ERROR"]);

        let bag = compiler()
            .compile(&document)
            .expect_err("unmappable argument must fail compilation");
        assert_eq!(codes(&bag), codes(&analysis.diagnostics));
    }
}

#[test]
fn test_check_maps_loop_collections_and_constants() {
    let action = ActionDefinition::regular(
        "walk",
        vec![Parameter::new("items")],
        vec![
            Statement::VariableDeclaration {
                span: Span::default(),
                name: "total".to_string(),
                value: Expression::reference("missing"),
            },
            Statement::For {
                span: Span::default(),
                item: "item".to_string(),
                collection: Expression::reference("items"),
                body: vec![Statement::call("selectElement", vec![Expression::reference("item")])],
            },
        ],
    );

    let analysis = compiler().check(&program(vec![action], vec![]));
    assert_eq!(codes(&analysis.diagnostics), vec!["MAPPING_ERROR"]);
    assert_eq!(
        analysis.diagnostics.diagnostics()[0].message,
        "Cannot resolve \"missing\" to an action parameter or loop variable"
    );
}

#[test]
fn test_stagger_items_must_be_an_array_literal() {
    let highlight = ActionDefinition::regular(
        "highlight",
        vec![Parameter::new("item")],
        vec![Statement::call("addClass", vec![Expression::string("on")])],
    );
    let stagger = TimelineEvent::Stagger {
        span: Span::default(),
        delay: TimeExpression::millis(100.0),
        items: Expression::property_chain(Scope::GlobalData, ["items"]),
        action: ActionCall::new("highlight", vec![]),
        duration: TimeExpression::seconds(1.0),
    };

    let analysis = compiler().check(&program(vec![highlight], vec![timeline(vec![stagger])]));
    assert_eq!(codes(&analysis.diagnostics), vec!["MAPPING_ERROR"]);
}
