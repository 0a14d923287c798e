pub mod serializer;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

pub use serializer::to_value;

/// A zero-argument callable producing a value at lookup time.
pub type Callable = Arc<dyn Fn() -> Value + Send + Sync>;

/// Data a template is rendered against.
///
/// Every variant is usable as a context; which capabilities it offers
/// (map-like, record-like, list-like, reference, callable) is answered by the
/// `as_*` probes below rather than by matching on the variant directly.
#[derive(Clone, Default)]
pub enum Value {
    /// Missing data or a nil reference.
    #[default]
    Null,
    Bool(bool),
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    /// Ordered sequence, each element usable as a context.
    List(Vec<Value>),
    /// String-keyed map (e.g. `HashMap`, serialized structs).
    Map(HashMap<String, Value>),
    /// A struct exposing named fields and accessor methods.
    Record(Arc<dyn Record>),
    /// A reference to another value (`Box<T>`, `Arc<T>`, `Rc<T>`).
    Ref(Arc<Value>),
    Func(Callable),
}

/// Field and method access for struct-like contexts.
///
/// Usually implemented through `#[derive(Record)]`. Names are matched exactly,
/// case included.
pub trait Record: Send + Sync {
    /// Reads the field called `name`.
    fn field(&self, name: &str) -> Option<Value>;

    /// Invokes a zero-argument method callable on the record itself.
    fn method(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Invokes a zero-argument method that is only reachable when the record
    /// is held behind a reference.
    fn ref_method(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Anything that can be turned into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl Value {
    /// Wraps a record as a context value.
    pub fn record<R: Record + 'static>(record: R) -> Self {
        Value::Record(Arc::new(record))
    }

    /// Wraps a value behind a reference.
    pub fn reference(value: Value) -> Self {
        Value::Ref(Arc::new(value))
    }

    /// Wraps a zero-argument closure; it is invoked whenever a lookup lands on it.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Value::Func(Arc::new(f))
    }

    pub fn as_map_like(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_record_like(&self) -> Option<&dyn Record> {
        match self {
            Value::Record(r) => Some(r.as_ref()),
            _ => None,
        }
    }

    pub fn as_list_like(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Value> {
        match self {
            Value::Ref(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Follows references down to the first non-reference value.
    pub fn pointee(&self) -> &Value {
        let mut current = self;
        while let Some(inner) = current.as_reference() {
            current = inner;
        }
        current
    }

    /// Invokes callables until a plain value is produced.
    pub(crate) fn called(self) -> Value {
        let mut current = self;
        while let Some(f) = current.as_callable() {
            current = f();
        }
        current
    }

    /// Section truthiness: `false`, `Null` and empty lists are falsy, everything
    /// else is truthy. References are judged by what they point to.
    pub fn is_truthy(&self) -> bool {
        match self.pointee() {
            Value::Null | Value::Bool(false) => false,
            Value::List(l) => !l.is_empty(),
            _ => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null | Value::Record(_) => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
            Value::I64(n) => write!(f, "{}", n),
            Value::U64(n) => write!(f, "{}", n),
            Value::F64(n) => write!(f, "{}", n),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(m) => {
                let sorted: BTreeMap<_, _> = m.iter().collect();
                f.write_str("{")?;
                for (i, (k, v)) in sorted.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
            Value::Ref(inner) => write!(f, "{}", inner),
            Value::Func(func) => write!(f, "{}", func().called()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::I64(n) => f.debug_tuple("I64").field(n).finish(),
            Value::U64(n) => f.debug_tuple("U64").field(n).finish(),
            Value::F64(n) => f.debug_tuple("F64").field(n).finish(),
            Value::List(l) => f.debug_tuple("List").field(l).finish(),
            Value::Map(m) => f.debug_tuple("Map").field(m).finish(),
            Value::Record(_) => f.write_str("Record(..)"),
            Value::Ref(inner) => f.debug_tuple("Ref").field(inner).finish(),
            Value::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => Arc::ptr_eq(a, b),
            (Value::Ref(a), Value::Ref(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// --- Primitive impls ---
macro_rules! impl_to_value_primitive {
    ($rust_type:ty, $variant:ident, $target:ty) => {
        impl ToValue for $rust_type {
            fn to_value(&self) -> Value {
                Value::$variant(<$target>::from(*self))
            }
        }
    };
}

impl_to_value_primitive!(bool, Bool, bool);
impl_to_value_primitive!(i8, I64, i64);
impl_to_value_primitive!(i16, I64, i64);
impl_to_value_primitive!(i32, I64, i64);
impl_to_value_primitive!(i64, I64, i64);
impl_to_value_primitive!(u8, U64, u64);
impl_to_value_primitive!(u16, U64, u64);
impl_to_value_primitive!(u32, U64, u64);
impl_to_value_primitive!(u64, U64, u64);
impl_to_value_primitive!(f32, F64, f64);
impl_to_value_primitive!(f64, F64, f64);

impl ToValue for isize {
    fn to_value(&self) -> Value {
        Value::I64(*self as i64)
    }
}

impl ToValue for usize {
    fn to_value(&self) -> Value {
        Value::U64(*self as u64)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Null
    }
}

// Plain borrows are transparent; owning pointers below become references.
impl<T> ToValue for &T
where
    T: ToValue + ?Sized,
{
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        Value::reference((**self).to_value())
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self) -> Value {
        Value::reference((**self).to_value())
    }
}

impl<T: ToValue + ?Sized> ToValue for Rc<T> {
    fn to_value(&self) -> Value {
        Value::reference((**self).to_value())
    }
}

// None behaves like a nil reference.
impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(|v| v.to_value()).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<K: AsRef<str>, T: ToValue, S> ToValue for HashMap<K, T, S> {
    fn to_value(&self) -> Value {
        let mut map = HashMap::with_capacity(self.len());
        for (k, v) in self {
            map.insert(k.as_ref().to_string(), v.to_value());
        }
        Value::Map(map)
    }
}

impl<K: AsRef<str>, T: ToValue> ToValue for BTreeMap<K, T> {
    fn to_value(&self) -> Value {
        let mut map = HashMap::with_capacity(self.len());
        for (k, v) in self {
            map.insert(k.as_ref().to_string(), v.to_value());
        }
        Value::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i64,
    }

    impl Record for Point {
        fn field(&self, name: &str) -> Option<Value> {
            match name {
                "X" => Some(self.x.to_value()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(!Value::reference(Value::List(vec![])).is_truthy());

        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Str(String::new()).is_truthy());
        assert!(Value::I64(0).is_truthy());
        assert!(Value::Map(HashMap::new()).is_truthy());
        assert!(Value::record(Point { x: 1 }).is_truthy());
        assert!(Value::List(vec![Value::Null]).is_truthy());
    }

    #[test]
    fn test_capability_probes() {
        let rec = Value::record(Point { x: 3 });
        assert!(rec.as_map_like().is_none());
        assert_eq!(
            rec.as_record_like().and_then(|r| r.field("X")),
            Some(Value::I64(3))
        );

        let r = Value::reference(rec.clone());
        assert!(r.as_record_like().is_none());
        assert_eq!(r.as_reference(), Some(&rec));
        assert_eq!(r.pointee(), &rec);
    }

    #[test]
    fn test_to_value_conversions() {
        assert_eq!(5i32.to_value(), Value::I64(5));
        assert_eq!(5u8.to_value(), Value::U64(5));
        assert_eq!("hi".to_value(), Value::Str("hi".to_string()));
        assert_eq!(None::<i32>.to_value(), Value::Null);
        assert_eq!(
            vec![1, 2].to_value(),
            Value::List(vec![Value::I64(1), Value::I64(2)])
        );
        assert_eq!(Box::new(1).to_value(), Value::reference(Value::I64(1)));
        assert_eq!((&&"x").to_value(), Value::Str("x".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::F64(1.5).to_string(), "1.5");
        assert_eq!(vec!["a", "b"].to_value().to_string(), "[a, b]");

        let mut map = BTreeMap::new();
        map.insert("b", 2);
        map.insert("a", 1);
        assert_eq!(map.to_value().to_string(), "{a: 1, b: 2}");

        assert_eq!(Value::reference(Value::I64(7)).to_string(), "7");
        assert_eq!(Value::func(|| Value::I64(9)).to_string(), "9");
    }
}
