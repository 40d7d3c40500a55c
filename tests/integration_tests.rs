use format_args_expand::{
    EXPANDER_VERSION, ExpansionError, FormatMacroExpander, Limits, MacroInvocation, expand,
};

const PREFIX: &str = "format_args!(";

#[test]
fn test_appends_unbound_capture() {
    let body = "\"{x} and {y}\", y = 2";
    let expanded = expand("format_args", body).unwrap();
    assert_eq!(
        expanded.text(),
        "format_args!(\"{x} and {y}\", y = 2, x = x)"
    );

    // the appended `x` points at the `x` inside the template
    let appended = expanded.text().len() - 2;
    assert_eq!(expanded.ranges().map_offset_to_source(appended), Some(2));
    // the synthesized `x = ` has no source
    assert_eq!(expanded.ranges().map_offset_to_source(appended - 2), None);
}

#[test]
fn test_all_explicit_is_left_alone() {
    assert_eq!(
        expand("format_args", "\"{0} {1}\", a, b"),
        Err(ExpansionError::NoImplicitArguments)
    );
    assert_eq!(
        expand("format_args", "\"no placeholders\""),
        Err(ExpansionError::NoImplicitArguments)
    );
}

#[test]
fn test_trailing_comma_is_reused() {
    let expanded = expand("format_args", "\"{x}\",").unwrap();
    assert_eq!(expanded.text(), "format_args!(\"{x}\", x = x)");
}

#[test]
fn test_asterisk_precision_and_shorthand() {
    // `.*` takes `prec`, and the shorthand `x` binds the name `x`
    assert_eq!(
        expand("format_args", "\"{x:.*}\", prec, x"),
        Err(ExpansionError::NoImplicitArguments)
    );
}

#[test]
fn test_unmatched_brace() {
    let error = expand("format_args", "\"{x\"").unwrap_err();
    assert!(matches!(error, ExpansionError::TemplateSyntax(_)));
    assert_eq!(error.diagnostics().len(), 1);
    assert_eq!(error.diagnostics()[0].span(), 1..2);
}

#[test]
fn test_every_template_error_is_reported() {
    let error = expand("format_args", "\"{fn} } {x:q} {\"").unwrap_err();
    let starts: Vec<_> = error
        .diagnostics()
        .iter()
        .map(|diagnostic| diagnostic.span().start)
        .collect();
    assert_eq!(starts.len(), 4);
    assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_not_a_format_macro() {
    assert_eq!(
        expand("format", "\"{x}\""),
        Err(ExpansionError::NotApplicable("format".into()))
    );
}

#[test]
fn test_structural_failures() {
    for body in ["", "42", "x, \"{x}\"", "\"{x}\" y", "\"{x}\", )"] {
        assert!(
            matches!(
                expand("format_args", body),
                Err(ExpansionError::StructuralParse(_))
            ),
            "{body:?} should not parse"
        );
    }
}

#[test]
fn test_format_args_nl() {
    let expanded = expand("format_args_nl", "\"{a}\"").unwrap();
    assert_eq!(expanded.text(), "format_args_nl!(\"{a}\", a = a)");
}

#[test]
fn test_body_is_copied_verbatim() {
    let body = "  \"{x}\"  ";
    let expanded = expand("format_args", body).unwrap();
    assert_eq!(expanded.text(), "format_args!(  \"{x}\"  , x = x)");

    let ranges = expanded.ranges();
    assert_eq!(ranges.map_range_to_source(0..expanded.text().len())[0], 0..body.len());
    let appended = expanded.text().len() - 2;
    assert_eq!(ranges.map_offset_to_source(appended), Some(4));
}

#[test]
fn test_forward_lookup_finds_both_copies() {
    let body = "\"{x}\"";
    let expanded = expand("format_args", body).unwrap();
    let copies: Vec<_> = expanded.ranges().map_offset_from_source_all(2).collect();
    assert_eq!(copies, vec![PREFIX.len() + 2, expanded.text().len() - 2]);
    assert_eq!(
        expanded.ranges().map_offset_from_source(2),
        Some(PREFIX.len() + 2)
    );
}

#[test]
fn test_line_comment_is_closed() {
    let expanded = expand("format_args", "\"{x}\" // trailing").unwrap();
    assert_eq!(expanded.text(), "format_args!(\"{x}\" // trailing\n, x = x)");
}

#[test]
fn test_slashes_in_block_comment_are_not_a_line_comment() {
    let expanded = expand("format_args", "\"{x}\", /* see // */").unwrap();
    assert_eq!(expanded.text(), "format_args!(\"{x}\", /* see // */ x = x)");
}

#[test]
fn test_reversed_range_maps_to_nothing() {
    let expanded = expand("format_args", "\"{x}\"").unwrap();
    let end = expanded.text().len();
    assert!(expanded.ranges().map_range_to_source(end..end - 2).is_empty());
}

#[test]
fn test_raw_string_template() {
    let expanded = expand("format_args", "r#\"{x} \"quoted\"\"#").unwrap();
    assert!(expanded.text().ends_with("\"#, x = x)"));
    let appended = expanded.text().len() - 2;
    assert_eq!(expanded.ranges().map_offset_to_source(appended), Some(4));
}

#[test]
fn test_invocation_and_expander_agree() {
    let body = "\"{a} {b:>w$}\", 1";
    let invocation = MacroInvocation::new("format_args", body);
    let expander = FormatMacroExpander::new(Limits::default());
    assert_eq!(invocation.expand(), expander.expand("format_args", body));
    assert_eq!(expander.version(), EXPANDER_VERSION);
}

#[test]
fn test_deterministic_across_threads() {
    let bodies = [
        "\"{x} and {y}\", y = 2",
        "\"{a:>w$.p$}\"",
        "r\"{name}\", 1,",
        "\"{x}\" // comment",
    ];
    let expected: Vec<_> = bodies
        .iter()
        .map(|body| expand("format_args", body))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    bodies
                        .iter()
                        .map(|body| expand("format_args", body))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
