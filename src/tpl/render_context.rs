use crate::value::Value;

/// The stack of data scopes consulted when resolving a tag's identifier.
///
/// The root context sits at the bottom; sections push one entry per
/// iteration and pop it afterwards. Lookups probe the top first.
pub struct Context {
    stack: Vec<Value>,
}

impl Context {
    pub fn new(root: Value) -> Self {
        Self { stack: vec![root] }
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) {
        // The root is never popped.
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Resolves `key` against the stack. `None` means not found.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        // 1) The implicit iterator names the current scope itself.
        if key == "." {
            return self.stack.last().cloned().map(Value::called);
        }

        // 2) Try an exact match, top of the stack first.
        if let Some(v) = self.find_exact(key) {
            return Some(v);
        }

        // 3) Try dotted-path lookup (e.g. "user.name"): only the head walks the stack.
        if let Some((head, rest)) = key.split_once('.')
            && let Some(head_value) = self.find_exact(head)
        {
            return Self::resolve_path(head_value, rest);
        }

        None
    }

    fn find_exact(&self, key: &str) -> Option<Value> {
        self.stack
            .iter()
            .rev()
            .find_map(|scope| probe(scope, key, false))
            .map(Value::called)
    }

    /// Resolve a dot-separated path within a single value.
    fn resolve_path(mut current: Value, path: &str) -> Option<Value> {
        for part in path.split('.') {
            current = probe(&current, part, false)?.called();
        }
        Some(current)
    }
}

/// Looks `name` up in one scope, trying map, record, reference and callable
/// capabilities in that order.
///
/// `via_ref` is set once a reference has been followed; only then are
/// reference-receiver methods eligible.
fn probe(scope: &Value, name: &str, via_ref: bool) -> Option<Value> {
    if let Some(map) = scope.as_map_like()
        && let Some(v) = map.get(name)
    {
        return Some(v.clone());
    }

    if let Some(record) = scope.as_record_like() {
        let found = record
            .method(name)
            .or_else(|| via_ref.then(|| record.ref_method(name)).flatten())
            .or_else(|| record.field(name));
        if found.is_some() {
            return found;
        }
    }

    if let Some(inner) = scope.as_reference() {
        return probe(inner, name, true);
    }

    if let Some(f) = scope.as_callable() {
        return probe(&f().called(), name, via_ref);
    }

    None
}
