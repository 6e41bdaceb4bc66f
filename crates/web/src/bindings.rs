//! Values bound by matchers while a route rule is evaluated.
//!
//! Path captures, query parameters and header values end up in [`Bound`]; a
//! decoded request entity is kept separately in [`Bindings`] so the handler
//! can take it by value.

use std::any::Any;
use std::fmt;

use crate::router::Rejection;

/// The value of an optional query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionalParam {
    /// `?name=value`
    Present(String),
    /// `?name=` or `?name`
    Empty,
    /// the parameter is not in the query string
    Absent,
}

impl OptionalParam {
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("") => OptionalParam::Empty,
            Some(value) => OptionalParam::Present(value.to_owned()),
            None => OptionalParam::Absent,
        }
    }

    /// `Empty` reads as `Some("")`, only `Absent` is `None`.
    pub fn as_option(&self) -> Option<&str> {
        match self {
            OptionalParam::Present(value) => Some(value),
            OptionalParam::Empty => Some(""),
            OptionalParam::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, OptionalParam::Absent)
    }
}

/// Path, query and header values bound by a successful matcher chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bound {
    path: Vec<(String, String)>,
    query: Vec<(String, String)>,
    optional_query: Vec<(String, OptionalParam)>,
    headers: Vec<(String, String)>,
}

impl Bound {
    pub fn path_param(&self, name: &str) -> Option<&str> {
        lookup(&self.path, name)
    }

    /// A required query parameter bound by `query_param`.
    pub fn query(&self, name: &str) -> Option<&str> {
        lookup(&self.query, name)
    }

    /// An optional query parameter bound by `optional_query_param`; `Absent` if it was never bound.
    pub fn optional_query(&self, name: &str) -> OptionalParam {
        self.optional_query
            .iter()
            .find(|(key, _)| key == name)
            .map_or(OptionalParam::Absent, |(_, value)| value.clone())
    }

    /// A header bound by the `header` matcher, name compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
    }

    pub fn require_query(&self, name: &str) -> Result<&str, Rejection> {
        self.query(name).ok_or_else(|| Rejection::missing_query_param(name))
    }

    pub fn require_header(&self, name: &str) -> Result<&str, Rejection> {
        self.header(name).ok_or_else(|| Rejection::missing_header(name))
    }

    pub fn require_path_param(&self, name: &str) -> Result<&str, Rejection> {
        self.path_param(name).ok_or(Rejection::NoMatch)
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.query.is_empty() && self.optional_query.is_empty() && self.headers.is_empty()
    }
}

fn lookup<'a>(values: &'a [(String, String)], name: &str) -> Option<&'a str> {
    values.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
}

/// Everything a matcher chain bound, handed to the handler once the chain succeeded.
#[derive(Default)]
pub struct Bindings {
    bound: Bound,
    entity: Option<Box<dyn Any + Send + Sync>>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound(&self) -> &Bound {
        &self.bound
    }

    pub fn bind_path(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bound.path.push((name.into(), value.into()));
    }

    pub fn bind_query(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bound.query.push((name.into(), value.into()));
    }

    pub fn bind_optional_query(&mut self, name: impl Into<String>, value: OptionalParam) {
        self.bound.optional_query.push((name.into(), value));
    }

    pub fn bind_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bound.headers.push((name.into(), value.into()));
    }

    /// Binds a decoded request entity, replacing any previous one.
    pub fn bind_entity<T: Send + Sync + 'static>(&mut self, entity: T) {
        self.entity = Some(Box::new(entity));
    }

    pub fn has_entity(&self) -> bool {
        self.entity.is_some()
    }

    /// Takes the bound entity if it has type `T`; an entity of another type stays bound.
    pub fn take_entity<T: 'static>(&mut self) -> Option<T> {
        match self.entity.take()?.downcast::<T>() {
            Ok(entity) => Some(*entity),
            Err(other) => {
                self.entity = Some(other);
                None
            }
        }
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            path: self.bound.path.len(),
            query: self.bound.query.len(),
            optional_query: self.bound.optional_query.len(),
            headers: self.bound.headers.len(),
            had_entity: self.entity.is_some(),
        }
    }

    /// Forgets everything bound after `checkpoint` was taken.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        self.bound.path.truncate(checkpoint.path);
        self.bound.query.truncate(checkpoint.query);
        self.bound.optional_query.truncate(checkpoint.optional_query);
        self.bound.headers.truncate(checkpoint.headers);
        if !checkpoint.had_entity {
            self.entity = None;
        }
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings").field("bound", &self.bound).field("has_entity", &self.entity.is_some()).finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    path: usize,
    query: usize,
    optional_query: usize,
    headers: usize,
    had_entity: bool,
}
