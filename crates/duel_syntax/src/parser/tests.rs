#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on specific syntactic forms, automatic semicolon insertion, and the parser's error
/// recovery behavior (one error per broken statement, no cascades).
mod tests {
    use super::*;

    fn parse_str(source: &str) -> Result<Program, Vec<CompileError>> {
        parse_source(source)
    }

    fn single_expr(source: &str) -> Expr {
        let program = parse_str(source).unwrap();
        assert_eq!(program.body.len(), 1, "expected one statement in {source:?}");
        match &program.body[0].node {
            Stmt::Expr(e) => e.node.clone(),
            other => panic!("Expected expression statement, got {other:?}"),
        }
    }

    fn first_error(source: &str) -> String {
        let errors = parse_str(source).expect_err("source should fail to parse");
        errors[0].message.clone()
    }

    #[test]
    fn test_parse_function_and_return() {
        let program = parse_str("function add(a, b) { return a + b; }\nreturn { add };").unwrap();
        assert_eq!(program.body.len(), 2);
        match &program.body[0].node {
            Stmt::Function(f) => {
                assert_eq!(f.name.as_deref(), Some("add"));
                assert_eq!(f.params.len(), 2);
                assert!(!f.is_arrow);
            }
            other => panic!("Expected function, got {other:?}"),
        }
        match &program.body[1].node {
            Stmt::Return(Some(value)) => {
                assert!(matches!(&value.node, Expr::Object(props) if props == &vec![Property::Shorthand("add".to_string())]));
            }
            other => panic!("Expected return, got {other:?}"),
        }
    }

    #[test]
    fn test_asi_between_lines() {
        let program = parse_str("let a = 1\nlet b = 2\na + b").unwrap();
        assert_eq!(program.body.len(), 3);
    }

    #[test]
    fn test_missing_semicolon_on_one_line_is_error() {
        assert!(first_error("let a = 1 let b = 2").contains("Expected ';'"));
    }

    #[test]
    fn test_return_followed_by_newline_returns_undefined() {
        let program = parse_str("function f() { return\n42; }").unwrap();
        let Stmt::Function(f) = &program.body[0].node else {
            panic!("Expected function");
        };
        let FunctionBody::Block(body) = &f.body else {
            panic!("Expected block body");
        };
        assert_eq!(body.len(), 2);
        assert!(matches!(body[0].node, Stmt::Return(None)));
    }

    #[test]
    fn test_postfix_increment_does_not_cross_newline() {
        let program = parse_str("a\n++b").unwrap();
        assert_eq!(program.body.len(), 2);
        match &program.body[1].node {
            Stmt::Expr(e) => assert!(matches!(e.node, Expr::Update { prefix: true, .. })),
            other => panic!("Expected update expression, got {other:?}"),
        }
    }

    #[test]
    fn test_arrow_functions() {
        let program = parse_str("const f = (a, b = 2, ...rest) => a + b;\nconst g = x => x * 2;").unwrap();
        let arrows: Vec<Rc<Function>> = program
            .body
            .iter()
            .filter_map(|s| match &s.node {
                Stmt::VarDecl(decl) => match &decl.declarators[0].init {
                    Some(Spanned {
                        node: Expr::Function(f), ..
                    }) => Some(f.clone()),
                    _ => None,
                },
                _ => None,
            })
            .collect();
        assert_eq!(arrows.len(), 2);
        assert!(arrows[0].is_arrow);
        assert_eq!(arrows[0].params.len(), 2);
        assert_eq!(arrows[0].arity(), 1);
        assert!(arrows[0].rest.is_some());
        assert!(matches!(arrows[1].body, FunctionBody::Expr(_)));
    }

    #[test]
    fn test_parenthesized_expression_is_not_arrow() {
        let expr = single_expr("(a + b) * c;");
        assert!(matches!(expr, Expr::Binary(_, BinaryOp::Mul, _)));
    }

    #[test]
    fn test_precedence_and_associativity() {
        let Expr::Binary(left, BinaryOp::Add, right) = single_expr("1 + 2 * 3") else {
            panic!("Expected addition at the root");
        };
        assert_eq!(left.node, Expr::Number(1.0));
        assert!(matches!(right.node, Expr::Binary(_, BinaryOp::Mul, _)));

        let Expr::Binary(left, BinaryOp::Pow, right) = single_expr("2 ** 3 ** 2") else {
            panic!("Expected exponent at the root");
        };
        assert_eq!(left.node, Expr::Number(2.0));
        assert!(matches!(right.node, Expr::Binary(_, BinaryOp::Pow, _)));

        let Expr::Logical(left, LogicalOp::Or, _) = single_expr("a && b || c") else {
            panic!("Expected || at the root");
        };
        assert!(matches!(left.node, Expr::Logical(_, LogicalOp::And, _)));
    }

    #[test]
    fn test_regex_and_division() {
        let program = parse_str("const r = /ab+c/gi; const d = a / b / c;").unwrap();
        let inits: Vec<&Expr> = program
            .body
            .iter()
            .filter_map(|s| match &s.node {
                Stmt::VarDecl(decl) => decl.declarators[0].init.as_ref().map(|e| &e.node),
                _ => None,
            })
            .collect();
        assert!(matches!(inits[0], Expr::Regex { pattern, flags } if pattern == "ab+c" && flags == "gi"));
        assert!(matches!(inits[1], Expr::Binary(_, BinaryOp::Div, _)));
    }

    #[test]
    fn test_for_loop_forms() {
        let program = parse_str(
            "for (let i = 0; i < 3; i++) {}\nfor (const x of xs) {}\nfor (k in obj) {}\nfor (;;) { break; }",
        )
        .unwrap();
        assert!(matches!(&program.body[0].node, Stmt::For(f) if f.init.is_some() && f.update.is_some()));
        assert!(matches!(&program.body[1].node, Stmt::ForOf(f) if f.kind == Some(DeclKind::Const)));
        assert!(matches!(&program.body[2].node, Stmt::ForIn(f) if f.kind.is_none()));
        assert!(matches!(&program.body[3].node, Stmt::For(f) if f.init.is_none() && f.test.is_none()));
    }

    #[test]
    fn test_in_operator_inside_for_head_parentheses() {
        let program = parse_str("for (let ok = ('a' in obj); ok; ok = false) {}").unwrap();
        assert!(matches!(&program.body[0].node, Stmt::For(_)));
    }

    #[test]
    fn test_break_outside_loop_is_rejected() {
        assert_eq!(first_error("break;"), "Illegal break statement");
        assert_eq!(
            first_error("while (true) { function f() { break; } }"),
            "Illegal break statement"
        );
        assert!(first_error("switch (x) { case 1: continue; }").starts_with("Illegal continue"));
        assert!(parse_str("switch (x) { case 1: break; default: x = 2; }").is_ok());
    }

    #[test]
    fn test_unsupported_constructs() {
        assert_eq!(first_error("class A {}"), "'class' is not supported");
        assert_eq!(first_error("const o = { get x() { return 1; } };"), "Getter and setter syntax is not supported");
        assert_eq!(first_error("function* gen() {}"), "Generator function syntax is not supported");
        assert_eq!(first_error("outer: for (;;) {}"), "Labeled statement syntax is not supported");
    }

    #[test]
    fn test_get_and_set_remain_usable_as_keys() {
        let expr = single_expr("({ get: 1, set(v) { return v; }, get })");
        let Expr::Object(props) = expr else {
            panic!("Expected object literal");
        };
        assert_eq!(props.len(), 3);
        assert_eq!(props[2], Property::Shorthand("get".to_string()));
    }

    #[test]
    fn test_object_literal_keys() {
        let Expr::Object(props) = single_expr("({ add(a, b) { return a + b; }, [k]: 1, 2: 'two', 'x-y': 3, ...rest })")
        else {
            panic!("Expected object literal");
        };
        assert_eq!(props.len(), 5);
        assert!(matches!(&props[0], Property::KeyValue(PropKey::Static(k), v) if k == "add" && matches!(v.node, Expr::Function(_))));
        assert!(matches!(&props[1], Property::KeyValue(PropKey::Computed(_), _)));
        assert!(matches!(&props[2], Property::KeyValue(PropKey::Static(k), _) if k == "2"));
        assert!(matches!(&props[3], Property::KeyValue(PropKey::Static(k), _) if k == "x-y"));
        assert!(matches!(&props[4], Property::Spread(_)));
    }

    #[test]
    fn test_destructuring_declaration() {
        let program = parse_str("const { a, b: [c, d = 1], ...rest } = obj;").unwrap();
        let Stmt::VarDecl(decl) = &program.body[0].node else {
            panic!("Expected declaration");
        };
        let Pattern::Object(pattern) = &decl.declarators[0].target.node else {
            panic!("Expected object pattern");
        };
        assert_eq!(pattern.props.len(), 2);
        assert!(pattern.rest.is_some());
        let Pattern::Array(inner) = &pattern.props[1].value.target.node else {
            panic!("Expected nested array pattern");
        };
        assert!(inner.elements[1].as_ref().is_some_and(|e| e.default.is_some()));
    }

    #[test]
    fn test_destructuring_assignment_swap() {
        let Expr::Assign { op, target, .. } = single_expr("[a, b] = [b, a];") else {
            panic!("Expected assignment");
        };
        assert_eq!(op, AssignOp::Assign);
        assert!(matches!(&target.node, Pattern::Array(p) if p.elements.len() == 2));
    }

    #[test]
    fn test_invalid_assignment_targets() {
        assert_eq!(first_error("a + b = 1;"), "Invalid left-hand side in assignment");
        assert_eq!(first_error("[a] += 1;"), "Invalid left-hand side in assignment");
        assert!(first_error("f()++;").contains("postfix"));
    }

    #[test]
    fn test_const_requires_initializer() {
        assert_eq!(first_error("const x;"), "Missing initializer in const declaration");
    }

    #[test]
    fn test_template_expressions_keep_absolute_spans() {
        let source = "`x ${a + 1} y`";
        let Expr::Template(parts) = single_expr(source) else {
            panic!("Expected template");
        };
        let exprs: Vec<&Spanned<Expr>> = parts
            .iter()
            .filter_map(|p| match p {
                TemplatePart::Expr(e) => Some(e),
                TemplatePart::Str(_) => None,
            })
            .collect();
        assert_eq!(exprs.len(), 1);
        assert_eq!(&source[exprs[0].span.start..exprs[0].span.end], "a + 1");
    }

    #[test]
    fn test_optional_chain_links() {
        let Expr::Member { object, optional, .. } = single_expr("a?.b?.(c)?.[0]") else {
            panic!("Expected member expression");
        };
        assert!(optional);
        assert!(matches!(object.node, Expr::Call { optional: true, .. }));
    }

    #[test]
    fn test_new_binds_tighter_than_member_access() {
        let Expr::Member { object, .. } = single_expr("new Foo(1).bar") else {
            panic!("Expected member expression");
        };
        assert!(matches!(&object.node, Expr::New { args, .. } if args.len() == 1));
    }

    #[test]
    fn test_switch_rejects_duplicate_default() {
        assert!(first_error("switch (x) { default: break; default: break; }").contains("More than one default"));
    }

    #[test]
    fn test_try_requires_handler_or_finalizer() {
        assert!(first_error("try { x(); }").contains("Missing catch or finally"));
        let program = parse_str("try { x(); } catch { y(); } finally { z(); }").unwrap();
        assert!(matches!(&program.body[0].node, Stmt::Try(t) if t.handler.as_ref().is_some_and(|h| h.param.is_none())));
    }

    #[test]
    fn test_error_recovery_reports_each_broken_statement() {
        let errors = parse_str("let = ;\nlet ok = 1;\nlet = 2;").expect_err("two broken declarations");
        assert_eq!(errors.len(), 2, "got: {errors:?}");
    }

    #[test]
    fn test_deep_nesting_is_an_error_not_a_crash() {
        let handle = std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(|| {
                let depth = MAX_NESTING + 20;
                let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
                parse_str(&source).map(|_| ())
            })
            .unwrap();
        let errors = handle.join().unwrap().expect_err("nesting past the limit must fail");
        assert!(errors[0].message.contains("nested too deeply"));
    }

    #[test]
    fn test_parse_expression_requires_single_expression() {
        assert!(matches!(
            parse_expression("function () { return 1; }").map(|e| e.node),
            Ok(Expr::Function(_))
        ));
        assert!(parse_expression("1; 2").is_err());
    }
}
