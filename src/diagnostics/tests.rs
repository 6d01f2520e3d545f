use super::*;
use pretty_assertions::assert_eq;

fn span(line: usize, col: usize) -> Span {
    Span::new(PathBuf::from("intro.eligian"), 0, 0, line, col, line, col + 7)
}

#[test]
fn test_diagnostic_json_carries_code_and_hint() {
    let diag = Diagnostic::error(operations::UNKNOWN_OPERATION)
        .message("Unknown operation: \"adClass\"")
        .hint("Did you mean: addClass?")
        .span(span(3, 5))
        .suggestion(Suggestion::replace_with("addClass"))
        .build();

    let value: serde_json::Value = serde_json::from_str(&diag.to_json()).unwrap();
    assert_eq!(value["code"], "UNKNOWN_OPERATION");
    assert_eq!(value["severity"], "error");
    assert_eq!(value["hint"], "Did you mean: addClass?");
    assert_eq!(value["suggestions"][0]["title"], "Replace with `addClass`");
    assert_eq!(value["suggestions"][0]["replacement"], "addClass");
}

#[test]
fn test_empty_fields_are_omitted_from_json() {
    let diag = Diagnostic::error(mapping::MAPPING_ERROR)
        .message("missing")
        .build();
    let json = diag.to_json();
    assert!(!json.contains("\"hint\""));
    assert!(!json.contains("\"notes\""));
    assert!(!json.contains("\"suggestions\""));
}

#[test]
fn test_diagnostic_round_trips_through_json() {
    let diag = Diagnostic::error(actions::DUPLICATE_ACTION)
        .message("Duplicate action \"fadeIn\"")
        .span(span(9, 1))
        .note(Note::new("first defined here").with_span(span(1, 1)))
        .build();

    let parsed: Diagnostic = serde_json::from_str(&diag.to_json()).unwrap();
    assert_eq!(parsed.code, actions::DUPLICATE_ACTION);
    assert_eq!(parsed.span, span(9, 1));
    assert_eq!(parsed.notes[0].span, Some(span(1, 1)));
}

#[test]
fn test_span_in_file_only_fills_missing_path() {
    let anchored = Span::default().in_file("a.eligian");
    assert_eq!(anchored.file, PathBuf::from("a.eligian"));

    let kept = Span::file("b.eligian").in_file("a.eligian");
    assert_eq!(kept.file, PathBuf::from("b.eligian"));
}

#[test]
fn test_span_deserializes_with_missing_fields() {
    let span: Span = serde_json::from_str(r#"{"start_line": 3}"#).unwrap();
    assert_eq!(span.start_line, 3);
    assert_eq!(span.start, 0);
    assert!(span.has_location());
    assert!(!Span::default().has_location());
}

#[test]
fn test_span_display() {
    assert_eq!(span(4, 12).to_string(), "intro.eligian:4:12");
    assert_eq!(Span::default().to_string(), "<document>");
    assert_eq!(
        Span::default().in_file("scene.json").to_string(),
        "scene.json"
    );
}

#[test]
fn test_render() {
    let diag = Diagnostic::error(operations::PARAMETER_TYPE)
        .message("Argument 1 of \"wait\" (parameter \"milliseconds\") expects number, but got string")
        .hint("Pass a number value, e.g. 1000")
        .span(span(2, 3))
        .note(Note::new("declared here").with_span(span(1, 1)))
        .suggestion(Suggestion::new("Pass a number"))
        .build();

    assert_eq!(
        diag.render(),
        "error[PARAMETER_TYPE]: Argument 1 of \"wait\" (parameter \"milliseconds\") expects number, but got string\n\
         \x20 --> intro.eligian:2:3\n\
         \x20  = hint: Pass a number value, e.g. 1000\n\
         \x20  = note: declared here (intro.eligian:1:1)\n\
         \x20  = help: Pass a number\n"
    );
}

#[test]
fn test_diagnostic_bag_counts_errors_only() {
    let mut bag = DiagnosticBag::new();
    assert!(bag.is_empty());

    bag.push(
        Diagnostic::error(operations::UNKNOWN_OPERATION)
            .message("error")
            .build(),
    );
    bag.push(Diagnostic::warning("UNUSED_ACTION").message("unused").build());
    bag.extend([Diagnostic::error(inference::TYPE_CONFLICT)
        .message("conflict")
        .build()]);

    assert_eq!(bag.len(), 3);
    assert!(bag.has_errors());
    assert_eq!(bag.error_count(), 2);
    assert_eq!(bag.with_code(inference::TYPE_CONFLICT).count(), 1);
}

#[test]
fn test_diagnostic_bag_collect_and_json() {
    let bag: DiagnosticBag = vec![
        Diagnostic::error(operations::PARAMETER_COUNT)
            .message("err1")
            .build(),
        Diagnostic::error(mapping::MAPPING_ERROR)
            .message("err2")
            .build(),
    ]
    .into_iter()
    .collect();

    let value: serde_json::Value = serde_json::from_str(&bag.to_json()).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(2));
    assert_eq!(value[1]["code"], "MAPPING_ERROR");

    let single: DiagnosticBag = Diagnostic::warning("W").build().into();
    assert!(!single.has_errors());
    assert_eq!(single.take().len(), 1);
}
