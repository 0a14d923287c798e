use std::collections::HashMap;

use stache::{MemoryLoader, PartialLoader, ToValue, Value, partial_assets, render_with_loader};

#[test]
fn test_embedded_partials() {
    let assets = partial_assets!("tests/partials/*.mustache");
    let names: Vec<&str> = assets.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["header", "list"]);

    let loader = MemoryLoader::from_assets(assets);
    assert_eq!(loader.load("header").unwrap(), "Hi {{name}}");
}

#[test]
fn test_partial_shares_context() {
    let loader = MemoryLoader::from_assets(partial_assets!("tests/partials/*.mustache"));

    let mut data = HashMap::new();
    data.insert("name".to_string(), "Ann".to_value());
    data.insert("items".to_string(), vec!["a", "b"].to_value());
    let data = Value::Map(data);

    let with_partials = render_with_loader("{{> header}}!\n{{> list}}", &data, &loader).unwrap();
    let inlined = stache::render("Hi {{name}}!\n{{#items}}- {{.}}\n{{/items}}", &data).unwrap();
    assert_eq!(with_partials, "Hi Ann!\n- a\n- b\n");
    assert_eq!(with_partials, inlined);
}

#[test]
fn test_partial_inside_section_sees_pushed_scope() {
    let loader = MemoryLoader::new();
    loader.insert("row", "<{{name}}>");

    let mut data = HashMap::new();
    data.insert(
        "people",
        vec![
            HashMap::from([("name", "x")]),
            HashMap::from([("name", "y")]),
        ],
    );
    let out = render_with_loader("{{#people}}{{> row}}{{/people}}", &data, &loader).unwrap();
    assert_eq!(out, "<x><y>");
}

#[test]
fn test_closure_loader() {
    let loader = |name: &str| -> anyhow::Result<String> {
        match name {
            "greeting" => Ok("hello {{who}}".to_string()),
            other => anyhow::bail!("unknown partial {}", other),
        }
    };
    let data = HashMap::from([("who", "world")]);
    assert_eq!(
        render_with_loader("{{> greeting}}", &data, &loader).unwrap(),
        "hello world"
    );

    let err = render_with_loader("{{> nope}}", &data, &loader).unwrap_err();
    assert!(err.to_string().contains("unknown partial nope"));
}
