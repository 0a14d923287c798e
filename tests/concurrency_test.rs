use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use stache::{FileLoader, MemoryLoader, NullLoader, RenderOptions, Template, TemplateError, Value};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_shared_types_are_send_sync() {
    assert_send_sync::<Template>();
    assert_send_sync::<Value>();
    assert_send_sync::<MemoryLoader>();
    assert_send_sync::<FileLoader>();
    assert_send_sync::<NullLoader>();
    assert_send_sync::<RenderOptions>();
    assert_send_sync::<TemplateError>();
}

#[test]
fn test_one_template_rendered_from_many_threads() {
    let template = Arc::new(Template::parse("{{n}}{{> tail}}").unwrap());
    let loader = Arc::new(MemoryLoader::from_assets([("tail", "{{n}}")]));

    let renders: Vec<_> = (0..4)
        .map(|n| {
            let template = Arc::clone(&template);
            let loader = Arc::clone(&loader);
            thread::spawn(move || {
                let mut data = HashMap::new();
                data.insert("n", n);
                template.render_with_loader(&data, loader.as_ref())
            })
        })
        .collect();

    // Registering partials only needs `&self`, even while renders are running.
    let writer = {
        let loader = Arc::clone(&loader);
        thread::spawn(move || {
            for i in 0..50 {
                loader.insert(format!("extra_{}", i), "x");
            }
        })
    };

    let mut outputs: Vec<String> = renders
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    writer.join().unwrap();
    outputs.sort();

    assert_eq!(outputs, vec!["00", "11", "22", "33"]);
    assert_eq!(loader.len(), 51);
}
