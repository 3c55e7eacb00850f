// Parameter hygiene
//
// Caller arguments arrive as loosely-shaped values (scalar or list, integer
// or string). Everything here is pure: inputs are borrowed, outputs are new
// values, and the URL layer downstream only ever sees strings.

use std::fmt;

use indexmap::IndexMap;

use crate::error::Error;

pub(crate) const MISSING_ID: &str = "one of id, ids must be provided";
pub(crate) const EXCLUSIVE_ID: &str = "id and ids are mutually exclusive";

// ── Values ───────────────────────────────────────────────────────────

/// A single query-parameter value as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Absent / unset. Never transmitted.
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    /// Multi-valued parameter, sent as repeated `key=value` pairs.
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// `true` for `Null` and for lists with no present element.
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Null => true,
            Self::List(items) => items.iter().all(Self::is_absent),
            _ => false,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
            Self::List(_) => "list",
        }
    }

    /// Drop absent list elements; `None` if nothing is left to send.
    fn compact(&self) -> Option<Self> {
        match self {
            Self::Null => None,
            Self::List(items) => {
                let kept: Vec<Self> = items.iter().filter_map(Self::compact).collect();
                if kept.is_empty() {
                    None
                } else {
                    Some(Self::List(kept))
                }
            }
            scalar => Some(scalar.clone()),
        }
    }

    fn push_wire_values(&self, out: &mut Vec<String>) {
        match self {
            Self::Null => {}
            Self::Bool(b) => out.push(b.to_string()),
            Self::Int(i) => out.push(i.to_string()),
            Self::Str(s) => out.push(s.clone()),
            Self::List(items) => {
                for item in items {
                    item.push_wire_values(out);
                }
            }
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

// ── Parameter mapping ────────────────────────────────────────────────

/// Ordered `{name → value}` mapping of query parameters.
///
/// Insertion order is preserved all the way to the wire, so equal inputs
/// always produce byte-identical query strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(IndexMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A repeated name replaces the earlier value in place.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Append every entry of `other`, overwriting equal names in place.
    pub fn with_all(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Drop every absent entry; keep `false`, `0` and non-empty lists.
    ///
    /// Returns a new mapping whose keys are a subset of `self`'s, in the
    /// same order. Idempotent.
    pub fn sanitized(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter_map(|(k, v)| v.compact().map(|v| (k.clone(), v)))
                .collect(),
        )
    }

    /// Flatten into wire pairs, repeating multi-valued keys in input order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (name, value) in &self.0 {
            let mut values = Vec::new();
            value.push_wire_values(&mut values);
            pairs.extend(values.into_iter().map(|v| (name.clone(), v)));
        }
        pairs
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ── Schema ───────────────────────────────────────────────────────────

/// Declared wire type of a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Boolean,
    Integer,
    String,
    /// One string or a list of strings.
    StringList,
}

impl ParamType {
    fn accepts(self, value: &ParamValue) -> bool {
        match (self, value) {
            (Self::Boolean, ParamValue::Bool(_))
            | (Self::Integer, ParamValue::Int(_))
            | (Self::String | Self::StringList, ParamValue::Str(_)) => true,
            (Self::StringList, ParamValue::List(items)) => {
                items.iter().all(|v| matches!(v, ParamValue::Str(_)))
            }
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::String => "string",
            Self::StringList => "string list",
        })
    }
}

/// One entry of a descriptor's query schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub required: bool,
    pub ty: ParamType,
}

impl ParamSpec {
    pub const fn optional(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            required: false,
            ty,
        }
    }

    pub const fn required(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            required: true,
            ty,
        }
    }
}

/// Sanitize `params` and check them against `schema`.
///
/// An empty schema accepts any names; a non-empty one rejects names it
/// does not declare. Type and presence checks run on the sanitized
/// mapping, so an explicit `Null` never trips a type check.
pub fn prepare_query(params: &Params, schema: &[ParamSpec]) -> Result<Params, Error> {
    let clean = params.sanitized();

    for (name, value) in clean.iter() {
        match schema.iter().find(|spec| spec.name == name) {
            Some(spec) if !spec.ty.accepts(value) => {
                return Err(Error::argument(format!(
                    "query parameter '{name}' expects {}, got {}",
                    spec.ty,
                    value.type_name()
                )));
            }
            Some(_) => {}
            None if schema.is_empty() => {}
            None => {
                return Err(Error::argument(format!(
                    "unknown query parameter '{name}'"
                )));
            }
        }
    }

    if let Some(missing) = schema
        .iter()
        .find(|spec| spec.required && !clean.contains(spec.name))
    {
        return Err(Error::argument(format!(
            "missing required query parameter '{}'",
            missing.name
        )));
    }

    Ok(clean)
}

// ── Identifier modes ─────────────────────────────────────────────────

/// A resource identifier: the server accepts both numeric and string forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Int(i64),
    Str(String),
}

impl Identifier {
    /// An empty string identifier counts as absent.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Str(s) if s.is_empty())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Identifier {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Identifier {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for Identifier {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Identifier {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&Identifier> for Identifier {
    fn from(v: &Identifier) -> Self {
        v.clone()
    }
}

/// The `{id?, ids?}` pair accepted by delete and bulk operations.
///
/// Both fields are public so callers can express any combination; only
/// [`IdArgs::resolve`] decides what is legal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdArgs {
    pub id: Option<Identifier>,
    pub ids: Option<Vec<Identifier>>,
}

impl IdArgs {
    /// Target a single resource.
    pub fn id(id: impl Into<Identifier>) -> Self {
        Self {
            id: Some(id.into()),
            ids: None,
        }
    }

    /// Target several resources at once.
    pub fn ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Identifier>,
    {
        Self {
            id: None,
            ids: Some(ids.into_iter().map(Into::into).collect()),
        }
    }

    /// Enforce "exactly one of `id`, `ids`" and coerce to strings.
    ///
    /// An empty string id or an empty list counts as absent.
    pub fn resolve(&self) -> Result<IdTarget, Error> {
        let single = self.id.as_ref().filter(|id| !id.is_empty());
        let multi = self.ids.as_ref().filter(|ids| !ids.is_empty());

        match (single, multi) {
            (None, None) => Err(Error::argument(MISSING_ID)),
            (Some(_), Some(_)) => Err(Error::argument(EXCLUSIVE_ID)),
            (Some(id), None) => Ok(IdTarget::Single(id.to_string())),
            (None, Some(ids)) => {
                if ids.iter().any(Identifier::is_empty) {
                    return Err(Error::argument("ids must not contain empty identifiers"));
                }
                Ok(IdTarget::Many(ids.iter().map(ToString::to_string).collect()))
            }
        }
    }
}

/// Normalized identifier mode: everything is a string from here on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdTarget {
    Single(String),
    Many(Vec<String>),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn paging() -> Params {
        Params::new()
            .with("page", 0)
            .with("page-size", 50)
            .with("sort", vec!["id:asc"])
            .with("filter", Option::<String>::None)
    }

    #[test]
    fn sanitize_drops_null_and_keeps_zero_and_false() {
        let params = Params::new()
            .with("page", 0)
            .with("force", false)
            .with("filter", ParamValue::Null)
            .with("section", Vec::<String>::new());

        let clean = params.sanitized();
        assert_eq!(clean.len(), 2);
        assert_eq!(clean.get("page"), Some(&ParamValue::Int(0)));
        assert_eq!(clean.get("force"), Some(&ParamValue::Bool(false)));
        assert!(!clean.contains("filter"));
        assert!(!clean.contains("section"));
    }

    #[test]
    fn sanitize_never_introduces_keys() {
        let params = paging();
        let clean = params.sanitized();
        for (name, _) in clean.iter() {
            assert!(params.contains(name), "introduced key {name}");
        }
        // caller input untouched
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn sanitize_is_idempotent() {
        let params = paging().with(
            "section",
            ParamValue::List(vec![ParamValue::Null, "GENERAL".into(), ParamValue::Null]),
        );
        let once = params.sanitized();
        assert_eq!(once.sanitized(), once);
        assert_eq!(
            once.get("section"),
            Some(&ParamValue::List(vec!["GENERAL".into()]))
        );
    }

    #[test]
    fn list_of_only_nulls_is_absent() {
        let params = Params::new().with("sort", ParamValue::List(vec![ParamValue::Null]));
        assert!(params.sanitized().is_empty());
    }

    #[test]
    fn multi_valued_keys_repeat_in_input_order() {
        let params = Params::new()
            .with("section", vec!["GENERAL", "HARDWARE", "USER_AND_LOCATION"])
            .with("page", 1);
        let pairs = params.to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("section".to_owned(), "GENERAL".to_owned()),
                ("section".to_owned(), "HARDWARE".to_owned()),
                ("section".to_owned(), "USER_AND_LOCATION".to_owned()),
                ("page".to_owned(), "1".to_owned()),
            ]
        );
    }

    #[test]
    fn prepare_query_checks_declared_types() {
        let schema = [
            ParamSpec::optional("page", ParamType::Integer),
            ParamSpec::optional("sort", ParamType::StringList),
        ];

        let ok = prepare_query(&Params::new().with("page", 2).with("sort", "name:desc"), &schema);
        assert!(ok.is_ok());

        let err = prepare_query(&Params::new().with("page", "two"), &schema).unwrap_err();
        assert!(
            matches!(&err, Error::Argument(m) if m.contains("'page' expects integer, got string")),
            "got {err:?}"
        );

        let err = prepare_query(&Params::new().with("sort", vec![1, 2]), &schema).unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
    }

    #[test]
    fn prepare_query_rejects_unknown_names_only_with_schema() {
        let schema = [ParamSpec::optional("page", ParamType::Integer)];
        let params = Params::new().with("pgae", 1);
        assert!(matches!(
            prepare_query(&params, &schema),
            Err(Error::Argument(_))
        ));
        assert!(prepare_query(&params, &[]).is_ok());
    }

    #[test]
    fn prepare_query_enforces_required_after_sanitizing() {
        let schema = [ParamSpec::required("serialNumber", ParamType::String)];
        let params = Params::new().with("serialNumber", ParamValue::Null);
        let err = prepare_query(&params, &schema).unwrap_err();
        assert!(
            matches!(&err, Error::Argument(m) if m.contains("serialNumber")),
            "got {err:?}"
        );
    }

    #[test]
    fn id_args_both_absent() {
        let err = IdArgs::default().resolve().unwrap_err();
        assert!(matches!(&err, Error::Argument(m) if m == MISSING_ID));
    }

    #[test]
    fn id_args_both_present() {
        let args = IdArgs {
            id: Some(1.into()),
            ids: Some(vec![2.into(), 3.into()]),
        };
        let err = args.resolve().unwrap_err();
        assert!(matches!(&err, Error::Argument(m) if m == EXCLUSIVE_ID));
    }

    #[test]
    fn id_args_single_coerces_to_string() {
        assert_eq!(
            IdArgs::id(42).resolve().unwrap(),
            IdTarget::Single("42".into())
        );
        assert_eq!(
            IdArgs::id("abc").resolve().unwrap(),
            IdTarget::Single("abc".into())
        );
    }

    #[test]
    fn id_args_mixed_list_becomes_strings() {
        let args = IdArgs::ids([
            Identifier::from(1),
            Identifier::from("2"),
            Identifier::from(3),
        ]);
        assert_eq!(
            args.resolve().unwrap(),
            IdTarget::Many(vec!["1".into(), "2".into(), "3".into()])
        );
    }

    #[test]
    fn empty_values_count_as_absent() {
        let args = IdArgs {
            id: Some("".into()),
            ids: Some(vec![]),
        };
        assert!(matches!(args.resolve(), Err(Error::Argument(m)) if m == MISSING_ID));

        let args = IdArgs {
            id: Some(7.into()),
            ids: Some(vec![]),
        };
        assert_eq!(args.resolve().unwrap(), IdTarget::Single("7".into()));
    }
}
