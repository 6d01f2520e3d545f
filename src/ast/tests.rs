use super::*;

#[test]
fn test_deserialize_action_from_json() {
    let json = r#"{
        "name": "fadeIn",
        "parameters": [{"name": "selector"}, {"name": "duration", "type": "number"}],
        "body": {
            "kind": "regular",
            "operations": [
                {"type": "OperationCall", "name": "selectElement",
                 "arguments": [{"type": "Reference", "name": "selector"}]}
            ]
        }
    }"#;
    let action: ActionDefinition = serde_json::from_str(json).unwrap();
    assert_eq!(action.name, "fadeIn");
    assert_eq!(action.parameters.len(), 2);
    assert_eq!(
        action.parameters[1].type_annotation,
        Some(TypeAnnotation::Number)
    );
    assert!(!action.is_endable());
    assert_eq!(action.bodies().len(), 1);
}

#[test]
fn test_endable_action_has_two_bodies() {
    let action = ActionDefinition::endable(
        "showThenHide",
        vec![Parameter::new("selector")],
        vec![Statement::call("selectElement", vec![Expression::reference("selector")])],
        vec![Statement::call("removeClass", vec![Expression::string("visible")])],
    );
    let bodies = action.bodies();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[1].len(), 1);
    assert!(action.parameter("selector").is_some());
    assert!(action.parameter("missing").is_none());
}

#[test]
fn test_deserialize_nested_statements() {
    let json = r#"[
        {"type": "If",
         "condition": {"type": "BooleanLiteral", "value": true},
         "then_branch": [{"type": "OperationCall", "name": "wait", "arguments": [{"type": "NumberLiteral", "value": 100}]}],
         "else_branch": null},
        {"type": "For", "item": "entry",
         "collection": {"type": "PropertyChain", "scope": "operationdata", "properties": ["items"]},
         "body": []},
        {"type": "VariableDeclaration", "name": "count", "value": {"type": "NumberLiteral", "value": 3}}
    ]"#;
    let statements: Vec<Statement> = serde_json::from_str(json).unwrap();
    assert!(matches!(statements[0], Statement::If { .. }));
    assert!(matches!(statements[1], Statement::For { .. }));
    assert!(matches!(statements[2], Statement::VariableDeclaration { .. }));
}

#[test]
fn test_property_chain_path() {
    let path = property_chain_path(
        Scope::Scope,
        &["currentItem".to_string(), "label".to_string()],
    );
    assert_eq!(path, "scope.currentItem.label");
    assert_eq!(property_chain_path(Scope::GlobalData, &[]), "globaldata");
}

#[test]
fn test_render_expressions() {
    let expr = Expression::binary(
        BinaryOp::Gt,
        Expression::property_chain(Scope::OperationData, ["count"]),
        Expression::number(5.0),
    );
    assert_eq!(expr.render(), "operationdata.count > 5");

    let object = Expression::object([("opacity", Expression::number(0.5))]);
    assert_eq!(object.render(), "{opacity: 0.5}");
    assert_eq!(Expression::string("a").render(), "'a'");
}

#[test]
fn test_format_number() {
    assert_eq!(format_number(1000.0), "1000");
    assert_eq!(format_number(1.5), "1.5");
    assert_eq!(format_number(-2.0), "-2");
}

#[test]
fn test_time_expression_evaluates_to_seconds() {
    let expr = TimeExpression::binary(
        TimeOp::Add,
        TimeExpression::seconds(2.0),
        TimeExpression::millis(500.0),
    );
    assert_eq!(expr.evaluate(), Some(2.5));

    let minutes: TimeExpression =
        serde_json::from_str(r#"{"type": "Literal", "value": 1, "unit": "m"}"#).unwrap();
    assert_eq!(minutes.evaluate(), Some(60.0));
}

#[test]
fn test_time_division_by_zero() {
    let expr = TimeExpression::binary(
        TimeOp::Div,
        TimeExpression::seconds(2.0),
        TimeExpression::seconds(0.0),
    );
    assert_eq!(expr.evaluate(), None);
}

#[test]
fn test_deserialize_timeline_events() {
    let json = r#"{
        "name": "main", "provider": "video",
        "events": [
            {"type": "Timed",
             "range": {"start": {"type": "Literal", "value": 0, "unit": "s"},
                       "end": {"type": "Literal", "value": 5, "unit": "s"}},
             "action": {"kind": "call", "name": "fadeIn", "arguments": []}},
            {"type": "Sequence",
             "items": [{"action": {"name": "intro"}, "duration": {"type": "Literal", "value": 2, "unit": "s"}}]}
        ]
    }"#;
    let timeline: Timeline = serde_json::from_str(json).unwrap();
    assert_eq!(timeline.events.len(), 2);
    assert!(matches!(
        &timeline.events[0],
        TimelineEvent::Timed {
            action: EventAction::Call(_),
            ..
        }
    ));
}

#[test]
fn test_deserialize_imports() {
    let json = r#"[
        {"type": "Default", "keyword": "layout", "path": "./layout.html"},
        {"type": "Named", "name": "intro", "path": "./intro.txt", "as": "html"}
    ]"#;
    let imports: Vec<ImportStatement> = serde_json::from_str(json).unwrap();
    assert_eq!(imports[0].path(), "./layout.html");
    assert!(matches!(
        imports[1],
        ImportStatement::Named {
            as_type: Some(AssetKind::Html),
            ..
        }
    ));
}
