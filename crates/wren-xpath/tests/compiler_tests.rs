//! Tests for XPath compilation: steps, predicates, folding and errors.

use wren_xpath::{
    Axis, BinaryOp, BodyExpr, BodyValue, NameTest, Operation, TagStep, XPathConfig, XPathError,
    XPathExpression,
};

fn compile(source: &str) -> Result<Vec<Operation>, XPathError> {
    XPathExpression::compile(source, &XPathConfig::default()).map(|expr| expr.operations().to_vec())
}

fn step(axis: Axis, name: &str, first: bool, multi_level: bool) -> Operation {
    let name = if name == "*" {
        NameTest::Any
    } else {
        NameTest::Name(name.to_string())
    };
    Operation::Step(TagStep {
        axis,
        name,
        first,
        multi_level,
        relative: false,
    })
}

// ========== steps ==========

#[test]
fn test_simple_path() {
    let ops = compile("/html/body//div").unwrap();
    assert_eq!(
        ops,
        vec![
            step(Axis::Child, "html", true, false),
            step(Axis::Child, "body", false, false),
            step(Axis::Child, "div", false, true),
        ]
    );
}

#[test]
fn test_missing_leading_slash_is_child_step() {
    assert_eq!(compile("div").unwrap(), vec![step(Axis::Child, "div", true, false)]);
}

#[test]
fn test_relative_first_step() {
    let ops = compile(".//li").unwrap();
    assert_eq!(
        ops[0],
        Operation::Step(TagStep {
            axis: Axis::SelfAxis,
            name: NameTest::Any,
            first: true,
            multi_level: false,
            relative: true,
        })
    );
    assert_eq!(ops[1], step(Axis::Child, "li", false, true));

    let ops = compile("parent::ul").unwrap();
    assert!(matches!(&ops[0], Operation::Step(TagStep { axis: Axis::Parent, relative: true, .. })));
    assert_eq!(ops[0].to_string(), "parent::ul");
    // Anchored axes stay on the virtual document node.
    let ops = compile("/parent::ul").unwrap();
    assert!(matches!(&ops[0], Operation::Step(TagStep { relative: false, .. })));
}

#[test]
fn test_tag_names_are_lowercased() {
    assert_eq!(compile("//DIV").unwrap(), vec![step(Axis::Child, "div", true, true)]);
}

#[test]
fn test_axes() {
    let ops = compile("//span/ancestor-or-self::div/parent::*/descendant::p").unwrap();
    assert_eq!(
        ops,
        vec![
            step(Axis::Child, "span", true, true),
            step(Axis::AncestorOrSelf, "div", false, false),
            step(Axis::Parent, "*", false, false),
            step(Axis::Descendant, "p", false, false),
        ]
    );
}

#[test]
fn test_node_suffix_and_abbreviations() {
    let ops = compile("//li::node()/child::node()/./..").unwrap();
    assert_eq!(
        ops,
        vec![
            step(Axis::Child, "li", true, true),
            step(Axis::Child, "*", false, false),
            step(Axis::SelfAxis, "*", false, false),
            step(Axis::Parent, "*", false, false),
        ]
    );
}

#[test]
fn test_step_display() {
    let expr = XPathExpression::compile("//self::p/a", &XPathConfig::default()).unwrap();
    let rendered: Vec<String> = expr.operations().iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["//self::p", "/a"]);
    assert_eq!(expr.source(), "//self::p/a");
}

// ========== predicates ==========

#[test]
fn test_predicates_follow_their_step() {
    let ops = compile(r#"//div[@id="x"][2]/span"#).unwrap();
    assert_eq!(ops.len(), 4);
    assert!(matches!(&ops[1], Operation::Predicate(BodyExpr::Binary { op: BinaryOp::Eq, .. })));
    assert_eq!(ops[2], Operation::Predicate(BodyExpr::Const(BodyValue::Number(2.0))));
    assert_eq!(ops[3], step(Axis::Child, "span", false, false));
}

#[test]
fn test_brackets_inside_strings() {
    let ops = compile(r#"//a[@title = "x]y"]"#).unwrap();
    assert_eq!(ops.len(), 2);
}

#[test]
fn test_constant_folding() {
    let ops = compile(r#"//li[@id = "ite" || "m2"]"#).unwrap();
    let Operation::Predicate(BodyExpr::Binary { right, .. }) = &ops[1] else {
        panic!("expected a comparison, got {:?}", ops[1]);
    };
    assert_eq!(**right, BodyExpr::Const(BodyValue::Str("item2".to_string())));

    let ops = compile(r#"//li[concat("a", "b", 1 + 1) = @x]"#).unwrap();
    let Operation::Predicate(BodyExpr::Binary { left, .. }) = &ops[1] else {
        panic!("expected a comparison, got {:?}", ops[1]);
    };
    assert_eq!(**left, BodyExpr::Const(BodyValue::Str("ab2".to_string())));
}

#[test]
fn test_node_dependent_calls_are_not_folded() {
    let ops = compile("//li[last()]").unwrap();
    assert!(matches!(&ops[1], Operation::Predicate(BodyExpr::Call(_, args)) if args.is_empty()));
}

#[test]
fn test_failed_fold_is_kept_for_runtime() {
    // Folding would fail; the error surfaces only when evaluated.
    let ops = compile(r#"//li["a" < 1]"#).unwrap();
    assert!(matches!(&ops[1], Operation::Predicate(BodyExpr::Binary { op: BinaryOp::Lt, .. })));
}

// ========== errors ==========

#[test]
fn test_unterminated_predicate() {
    let err = compile(r#"//div[@id="x""#).unwrap_err();
    assert!(matches!(err, XPathError::Parse { ref remainder, .. } if remainder == r#"[@id="x""#));
}

#[test]
fn test_trailing_slash() {
    assert!(compile("//div/").unwrap_err().is_parse_error());
}

#[test]
fn test_empty_expression() {
    assert!(compile("  ").unwrap_err().is_parse_error());
}

#[test]
fn test_predicate_without_step() {
    assert!(compile("[1]").unwrap_err().is_parse_error());
}

#[test]
fn test_unknown_axis() {
    let err = compile("//sibling::p").unwrap_err();
    assert!(matches!(err, XPathError::Parse { ref message, .. } if message.contains("sibling")));
}

#[test]
fn test_invalid_tag_name() {
    assert!(compile("//di v").unwrap_err().is_parse_error());
}

#[test]
fn test_unknown_function() {
    let err = compile("//li[frobnicate()]").unwrap_err();
    assert_eq!(
        err,
        XPathError::UnknownFunction {
            name: "frobnicate".to_string()
        }
    );
}

#[test]
fn test_wrong_arity() {
    let err = compile(r#"//li[concat("a")]"#).unwrap_err();
    assert!(matches!(err, XPathError::Parse { .. }));
    assert!(compile("//li[position(1)]").unwrap_err().is_parse_error());
}

#[test]
fn test_missing_operand_is_runtime_error() {
    assert!(compile("//li[@id =]").unwrap_err().is_runtime_error());
    assert!(compile("//li[@a or]").unwrap_err().is_runtime_error());
}

#[test]
fn test_unbalanced_parenthesis() {
    assert!(compile("//li[(1 + 2]").unwrap_err().is_parse_error());
}
