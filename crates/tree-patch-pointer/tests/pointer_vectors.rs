use tree_patch_pointer::{parse_pointer, Modifier, Pointer, PointerError, Token};

fn index(index: i64, modifiers: Vec<Modifier>) -> Token {
    Token::Index {
        index,
        modifiers,
        optional: false,
    }
}

#[test]
fn pointer_text_vectors() {
    let cases: Vec<(&str, Vec<Token>)> = vec![
        ("", vec![]),
        ("/", vec![Token::key("")]),
        ("/key", vec![Token::key("key")]),
        (
            "/key?/key2",
            vec![Token::optional_key("key"), Token::optional_key("key2")],
        ),
        ("/-", vec![Token::AfterLastIndex]),
        ("/0", vec![Token::index(0)]),
        ("/-1", vec![Token::index(-1)]),
        (
            "/-1:prev:before",
            vec![index(-1, vec![Modifier::Prev, Modifier::Before])],
        ),
        ("/name=val", vec![Token::matching("name", "val")]),
        (
            "/name=val?",
            vec![Token::matching("name", "val").into_optional()],
        ),
        ("/==", vec![Token::matching("", "=")]),
        ("/m~0n", vec![Token::key("m~n")]),
        ("/a~1b", vec![Token::key("a/b")]),
        ("/m~7n", vec![Token::key("m:n")]),
    ];

    for (text, steps) in cases {
        let mut tokens = vec![Token::Root];
        tokens.extend(steps);
        let expected = Pointer::new(tokens).unwrap();

        let parsed = parse_pointer(text).unwrap_or_else(|e| panic!("{text:?}: {e}"));
        assert_eq!(parsed, expected, "parse {text:?}");
        assert_eq!(expected.to_string(), text, "format {text:?}");
    }
}

#[test]
fn pointer_nested_paths() {
    let pointer = parse_pointer("/instance_groups/name=web/jobs/0:next:after/properties?").unwrap();
    assert_eq!(
        pointer.tokens(),
        &[
            Token::Root,
            Token::key("instance_groups"),
            Token::matching("name", "web"),
            Token::key("jobs"),
            index(0, vec![Modifier::Next, Modifier::After]),
            Token::optional_key("properties"),
        ]
    );
    assert_eq!(
        pointer.to_string(),
        "/instance_groups/name=web/jobs/0:next:after/properties?"
    );
}

#[test]
fn pointer_syntax_errors() {
    let cases = [
        ("a", PointerError::MissingLeadingSlash),
        ("/0:oops", PointerError::UnknownModifier("oops".to_string())),
        ("/-:next", PointerError::AfterLastIndexModifiers),
        ("/key:before", PointerError::KeyModifiers),
        ("/a/b:prev/c", PointerError::KeyModifiers),
    ];
    for (text, expected) in cases {
        assert_eq!(parse_pointer(text).unwrap_err(), expected, "{text:?}");
    }
}

#[test]
fn pointer_tokens_errors() {
    assert_eq!(
        Pointer::new(vec![Token::key("a")]).unwrap_err().to_string(),
        "Expected first token to be root"
    );
    assert_eq!(
        Pointer::new(vec![Token::Root, Token::key("a"), Token::Root])
            .unwrap_err()
            .to_string(),
        "Expected only first token to be root"
    );
}
