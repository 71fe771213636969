//! Translation tests against marker token tables.
//!
//! Each token is configured with a marker that cannot occur by accident, so
//! an assertion on the output pins where every token lands.

use transcoder::{
    DiagnosticKind, Level, Translation, TranslationConfig, translate_expr, translate_function,
    translate_stmt,
};
use transcoder_syntax::{
    BinaryOperator, BooleanOperator, CompareOperator, Expr, FunctionDef, Keyword, Stmt,
    read_python_function,
};

fn markers() -> TranslationConfig {
    TranslationConfig::from_pairs([
        ("function.define_key", "<DEF>"),
        ("function.return_key", "<RET>"),
        ("function.argument_separator", "<SEP>"),
        ("function.open_body", "<OPEN>"),
        ("function.close_body", "<CLOSE>"),
        ("assignment.assign_key", "<ASSIGN>"),
        ("assignment.multiple_assign_join", "<MJOIN>"),
        ("operator.add", "<ADD>"),
        ("operator.bit_or", "<BITOR>"),
        ("operator.and_op", "<AND>"),
        ("operator.equal", "<EQ>"),
        ("operator.not_in_op", "<NOTIN>"),
        ("access.attribute", "<DOT>"),
        ("access.subscript_open", "<SUB>"),
        ("access.subscript_close", "</SUB>"),
        ("literals.list_begin", "<L>"),
        ("literals.list_end", "</L>"),
        ("literals.list_join", "<LJ>"),
        ("literals.tuple_begin", "<T>"),
        ("literals.tuple_end", "</T>"),
        ("literals.tuple_join", "<TJ>"),
        ("literals.dict_begin", "<D>"),
        ("literals.dict_end", "</D>"),
        ("literals.dict_join", "<DJ>"),
        ("literals.dict_assign", "<DA>"),
        ("flow.if_key", "<IF>"),
        ("flow.if_begin", "<IFB>"),
        ("flow.if_end", "<IFE>"),
        ("flow.if_open_body", "<IFO>"),
        ("flow.if_close_body", "<IFC>"),
        ("flow.while_key", "<WHILE>"),
        ("flow.while_begin", "<WB>"),
        ("flow.while_end", "<WE>"),
        ("flow.while_open_body", "<WO>"),
        ("flow.while_close_body", "<WC>"),
        ("flow.foreach_key", "<FOR>"),
        ("flow.foreach_begin", "<FB>"),
        ("flow.foreach_end", "<FE>"),
        ("flow.foreach_open_body", "<FO>"),
        ("flow.foreach_close_body", "<FC>"),
        ("flow.foreach_separator", "<IN>"),
    ])
    .unwrap()
}

fn expr(e: &Expr) -> String {
    let (translation, diagnostics) = translate_expr(e, &markers());
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    translation.into_text()
}

fn stmt(s: &Stmt) -> String {
    let (translation, diagnostics) = translate_stmt(s, &markers());
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    translation.into_text()
}

#[test]
fn markers_land_where_configured() {
    let call = Expr::call(
        Expr::attribute(Expr::name("raw"), "fetch_all"),
        vec![Expr::string("projects"), Expr::name("client")],
    );
    insta::assert_snapshot!(expr(&call), @"raw<DOT>fetch_all(projects<SEP>client)");

    let sum = Expr::binary(Expr::name("a"), BinaryOperator::Add, Expr::int(1));
    insta::assert_snapshot!(expr(&sum), @"a<ADD>1");

    let flags = Expr::binary(Expr::name("a"), BinaryOperator::BitOr, Expr::name("b"));
    insta::assert_snapshot!(expr(&flags), @"a<BITOR>b");

    let all = Expr::boolean(
        BooleanOperator::And,
        vec![Expr::name("a"), Expr::name("b"), Expr::name("c")],
    );
    insta::assert_snapshot!(expr(&all), @"a<AND>b<AND>c");

    let subscript = Expr::subscript(Expr::name("project"), Expr::string("data"));
    insta::assert_snapshot!(expr(&subscript), @"project<SUB>data</SUB>");

    let list = Expr::list(vec![Expr::int(1), Expr::int(2)]);
    insta::assert_snapshot!(expr(&list), @"<L>1<LJ>2</L>");

    let tuple = Expr::tuple(vec![Expr::name("x"), Expr::name("y")]);
    insta::assert_snapshot!(expr(&tuple), @"<T>x<TJ>y</T>");

    let dict = Expr::dict(vec![
        (Some(Expr::string("id")), Expr::name("id")),
        (Some(Expr::string("name")), Expr::name("name")),
    ]);
    insta::assert_snapshot!(expr(&dict), @"<D>id<DA>id<DJ>name<DA>name</D>");

    let membership = Expr::compare(
        Expr::string("data"),
        CompareOperator::NotIn,
        Expr::name("project"),
    );
    insta::assert_snapshot!(expr(&membership), @"data<NOTIN>project");
}

#[test]
fn single_items_need_no_separator() {
    let config = TranslationConfig::from_pairs([
        ("literals.list_begin", "["),
        ("literals.list_end", "]"),
    ])
    .unwrap();
    let (translation, diagnostics) = translate_expr(&Expr::list(vec![Expr::int(1)]), &config);
    assert_eq!(translation.text(), "[1]");
    assert!(diagnostics.is_empty());

    let (translation, diagnostics) =
        translate_expr(&Expr::list(vec![Expr::int(1), Expr::int(2)]), &config);
    assert_eq!(translation, Translation::Unsupported(DiagnosticKind::MissingToken));
    assert_eq!(diagnostics.count(DiagnosticKind::MissingToken), 1);
}

#[test]
fn constants_fall_back_to_source_spelling() {
    assert_eq!(expr(&Expr::bool(true)), "True");
    assert_eq!(expr(&Expr::none()), "None");
    assert_eq!(expr(&Expr::float(2.0)), "2.0");
    assert_eq!(expr(&Expr::int(-7)), "-7");
    assert_eq!(expr(&Expr::string("hello")), "hello");

    let config = TranslationConfig::from_pairs([
        ("literals.true_literal", "true"),
        ("literals.null_literal", "null"),
        ("literals.string_begin", "\""),
        ("literals.string_end", "\""),
    ])
    .unwrap();
    let spell = |e: Expr| translate_expr(&e, &config).0.into_text();
    assert_eq!(spell(Expr::bool(true)), "true");
    assert_eq!(spell(Expr::bool(false)), "False");
    assert_eq!(spell(Expr::none()), "null");
    assert_eq!(spell(Expr::string("hello")), "\"hello\"");
}

#[test]
fn translation_is_pure() {
    let config = markers();
    let node = Stmt::assign(
        vec![Expr::name("x")],
        Expr::call(Expr::name("f"), vec![Expr::name("a"), Expr::name("b")]),
    );
    let first = translate_stmt(&node, &config);
    let second = translate_stmt(&node, &config);
    assert_eq!(first, second);
    assert_eq!(first.0.text(), "x<ASSIGN>f(a<SEP>b)");
}

#[test]
fn single_comparison_translates_chained_does_not() {
    let (translation, diagnostics) = translate_expr(
        &Expr::compare(Expr::name("a"), CompareOperator::Eq, Expr::name("b")),
        &markers(),
    );
    assert_eq!(translation.text(), "a<EQ>b");
    assert!(diagnostics.is_empty());

    let chained = Expr::Compare {
        left: Box::new(Expr::name("a")),
        ops: vec![CompareOperator::Lt, CompareOperator::Lt],
        comparators: vec![Expr::name("b"), Expr::name("c")],
    };
    let (translation, diagnostics) = translate_expr(&chained, &markers());
    assert_eq!(translation.text(), "");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics.count(DiagnosticKind::UnsupportedComparisonShape),
        1
    );
}

#[test]
fn unconfigured_operator_empties_only_its_expression() {
    let node = Stmt::assign(
        vec![Expr::name("total")],
        Expr::binary(Expr::name("a"), BinaryOperator::Pow, Expr::int(2)),
    );
    let (translation, diagnostics) = translate_stmt(&node, &markers());
    assert_eq!(translation.text(), "total<ASSIGN>");
    assert_eq!(diagnostics.count(DiagnosticKind::UnsupportedOperator), 1);
}

#[test]
fn keyless_dict_entry_is_skipped() {
    let dict = Expr::dict(vec![
        (Some(Expr::string("a")), Expr::int(1)),
        (None, Expr::name("extra")),
        (Some(Expr::string("b")), Expr::int(2)),
    ]);
    let (translation, diagnostics) = translate_expr(&dict, &markers());
    assert_eq!(translation.text(), "<D>a<DA>1<DJ>b<DA>2</D>");
    assert_eq!(diagnostics.count(DiagnosticKind::MalformedLiteral), 1);
}

#[test]
fn unsupported_child_leaves_parent_intact() {
    let call = Expr::call(
        Expr::name("f"),
        vec![Expr::other("Lambda"), Expr::name("b")],
    );
    let (translation, diagnostics) = translate_expr(&call, &markers());
    assert_eq!(translation.text(), "f(<SEP>b)");
    assert_eq!(diagnostics.count(DiagnosticKind::UnsupportedConstruct), 1);
}

#[test]
fn keyword_arguments_are_dropped_with_warning() {
    let call = Expr::Call {
        func: Box::new(Expr::name("fetch")),
        args: vec![Expr::name("path")],
        keywords: vec![Keyword {
            arg: Some("client".into()),
            value: Expr::name("client"),
        }],
    };
    let (translation, diagnostics) = translate_expr(&call, &markers());
    assert_eq!(translation.text(), "fetch(path)");
    assert_eq!(diagnostics.count_at(Level::Warning), 1);
}

#[test]
fn docstring_is_elided_later_expressions_kept() {
    let def = read_python_function(
        "def f():\n    \"doc\"\n    log(1)\n    return 1\n",
    )
    .unwrap();
    let (translation, diagnostics) = translate_function(&def, &markers());
    assert_eq!(translation.text(), "<DEF>f()<OPEN>\n\tlog(1)\n\t<RET>1<CLOSE>");
    assert!(diagnostics.is_empty());
}

#[test]
fn block_bodies_share_elision_and_flat_indent() {
    let body = vec![
        Stmt::expr(Expr::string("note")),
        Stmt::if_stmt(
            Expr::name("ok"),
            vec![Stmt::return_stmt(Some(Expr::name("x")))],
        ),
    ];
    let looped = Stmt::while_loop(Expr::name("running"), body.clone());
    assert_eq!(
        stmt(&looped),
        "<WHILE><WB>running<WE><WO>\n\t<IF><IFB>ok<IFE><IFO>\n\t<RET>x<IFC><WC>"
    );

    let each = Stmt::for_each(Expr::name("key"), Expr::name("data"), body);
    assert_eq!(
        stmt(&each),
        "<FOR><FB>key<IN>data<FE><FO>\n\t<IF><IFB>ok<IFE><IFO>\n\t<RET>x<IFC><FC>"
    );
}

#[test]
fn else_branch_is_dropped_with_warning() {
    let def = read_python_function(
        "def f(x):\n    if x:\n        return 1\n    else:\n        return 2\n",
    )
    .unwrap();
    let (translation, diagnostics) = translate_function(&def, &markers());
    assert_eq!(
        translation.text(),
        "<DEF>f(x)<OPEN>\n\t<IF><IFB>x<IFE><IFO>\n\t<RET>1<IFC><CLOSE>"
    );
    assert_eq!(diagnostics.count(DiagnosticKind::UnsupportedConstruct), 1);
    assert_eq!(diagnostics.count_at(Level::Warning), 1);
}

#[test]
fn multiple_assignment_wraps_only_when_both_ends_set() {
    let node = Stmt::assign(vec![Expr::name("a"), Expr::name("b")], Expr::int(0));

    let (translation, _) = translate_stmt(&node, &markers());
    assert_eq!(translation.text(), "a<MJOIN>b<ASSIGN>0");

    let wrapped = TranslationConfig {
        assignment: TranslationConfig::from_pairs([
            ("assignment.assign_key", " = "),
            ("assignment.multiple_assign_join", ", "),
            ("assignment.multiple_assign_begin", "["),
            ("assignment.multiple_assign_end", "]"),
        ])
        .unwrap()
        .assignment,
        ..markers()
    };
    let (translation, _) = translate_stmt(&node, &wrapped);
    assert_eq!(translation.text(), "[a, b] = 0");

    // a single target is wrapped too
    let single = Stmt::assign(vec![Expr::name("x")], Expr::int(0));
    let (translation, _) = translate_stmt(&single, &wrapped);
    assert_eq!(translation.text(), "[x] = 0");
    let (translation, _) = translate_stmt(&single, &markers());
    assert_eq!(translation.text(), "x<ASSIGN>0");

    let half = TranslationConfig::from_pairs([
        ("assignment.assign_key", " = "),
        ("assignment.multiple_assign_join", ", "),
        ("assignment.multiple_assign_begin", "["),
    ])
    .unwrap();
    let (translation, _) = translate_stmt(&node, &half);
    assert_eq!(translation.text(), "a, b = 0");
}

#[test]
fn unsupported_statement_keeps_its_line() {
    let def = FunctionDef::new(
        "f",
        vec![],
        vec![Stmt::other("Try"), Stmt::return_stmt(None)],
    );
    let (translation, diagnostics) = translate_function(&def, &markers());
    assert_eq!(translation.text(), "<DEF>f()<OPEN>\n\t\n\t<RET><CLOSE>");
    assert_eq!(diagnostics.count(DiagnosticKind::UnsupportedConstruct), 1);
    assert_eq!(diagnostics.count_at(Level::Error), 1);
}

#[test]
fn end_to_end_from_toml() {
    let config = TranslationConfig::from_toml_str(
        r#"
[function]
define_key = "FN "
argument_separator = ", "
open_body = " DO"
close_body = " END"

[assignment]
assign_key = " = "

[flow]
return_key = "GIVE "
"#,
    )
    .unwrap();
    let def = read_python_function("def f(a, b):\n    return a\n").unwrap();
    let (translation, diagnostics) = translate_function(&def, &config);
    assert_eq!(translation.text(), "FN f(a, b) DO\n\tGIVE a END");
    assert!(diagnostics.is_clean());
}
