//! A small declarative schema used to validate raw card configuration before
//! it is deserialized into typed sections.
//!
//! Validation collects every issue with the path it was found at, so that a
//! failure can be turned into hints for the user.  Union schemas keep the
//! issues of every branch they tried, because the branch that "should" have
//! matched is only known once the discriminator has been looked at.

use std::fmt;

use once_cell::sync::Lazy;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum IssueKind {
    InvalidType {
        expected: String,
        received: &'static str,
    },
    InvalidUnion {
        branches: Vec<ParseError>,
    },
    InvalidEnumValue {
        options: &'static [&'static str],
        received: String,
    },
    TooSmall {
        minimum: f64,
    },
    TooBig {
        maximum: f64,
    },
    Custom {
        message: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Issue {
    pub path: Vec<PathSegment>,
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::InvalidType { expected, received } => {
                write!(f, "expected {expected}, received {received}")
            }
            IssueKind::InvalidUnion { branches } => {
                write!(f, "no union option matched ({} tried)", branches.len())
            }
            IssueKind::InvalidEnumValue { options, received } => {
                write!(f, "invalid value '{received}', expected one of {options:?}")
            }
            IssueKind::TooSmall { minimum } => write!(f, "must be at least {minimum}"),
            IssueKind::TooBig { maximum } => write!(f, "must be at most {maximum}"),
            IssueKind::Custom { message } => f.write_str(message),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseError {
    pub issues: Vec<Issue>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} configuration issue(s)", self.issues.len())
    }
}

/// How badly a value failed.  An aborted value (wrong type, unknown enum
/// value) rules its union branch out, a dirty one (out of range, failed
/// refinement) still counts as the branch the user meant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
enum Status {
    Valid,
    Dirty,
    Aborted,
}

pub type Refinement = fn(&Value) -> Result<(), String>;

pub enum Schema {
    Any,
    Bool,
    String,
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    Literal(&'static str),
    Enum(&'static [&'static str]),
    Array(Box<Schema>),
    Tuple(Vec<Schema>),
    /// Object with arbitrary keys, all values following one schema.
    Record(Box<Schema>),
    Object(Vec<Field>),
    Union(Vec<Schema>),
    Refine(Box<Schema>, Refinement),
    Ref(&'static Lazy<Schema>),
}

pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
    pub required: bool,
}

pub fn required(name: &'static str, schema: Schema) -> Field {
    Field {
        name,
        schema,
        required: true,
    }
}

pub fn optional(name: &'static str, schema: Schema) -> Field {
    Field {
        name,
        schema,
        required: false,
    }
}

impl Schema {
    pub fn number() -> Self {
        Schema::Number {
            min: None,
            max: None,
        }
    }

    pub fn number_min(min: f64) -> Self {
        Schema::Number {
            min: Some(min),
            max: None,
        }
    }

    pub fn array(item: Schema) -> Self {
        Schema::Array(Box::new(item))
    }

    pub fn record(value: Schema) -> Self {
        Schema::Record(Box::new(value))
    }

    pub fn refine(self, check: Refinement) -> Self {
        Schema::Refine(Box::new(self), check)
    }

    pub fn parse(&self, value: &Value) -> Result<(), ParseError> {
        let mut issues = Vec::new();
        self.check(Some(value), &mut Vec::new(), &mut issues);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ParseError { issues })
        }
    }

    fn expected(&self) -> String {
        match self {
            Schema::Any => "any".to_string(),
            Schema::Bool => "boolean".to_string(),
            Schema::String | Schema::Enum(_) => "string".to_string(),
            Schema::Number { .. } => "number".to_string(),
            Schema::Literal(literal) => format!("'{literal}'"),
            Schema::Array(_) | Schema::Tuple(_) => "array".to_string(),
            Schema::Record(_) | Schema::Object(_) => "object".to_string(),
            Schema::Union(_) => "union".to_string(),
            Schema::Refine(inner, _) => inner.expected(),
            Schema::Ref(inner) => inner.expected(),
        }
    }

    fn check(
        &self,
        value: Option<&Value>,
        path: &mut Vec<PathSegment>,
        issues: &mut Vec<Issue>,
    ) -> Status {
        let value = match (self, value) {
            (Schema::Any, _) => return Status::Valid,
            (_, Some(value)) => value,
            (_, None) => {
                return self.invalid_type(path, issues, "undefined");
            }
        };
        match self {
            Schema::Any => Status::Valid,
            Schema::Bool => match value {
                Value::Bool(_) => Status::Valid,
                other => self.invalid_type(path, issues, type_name(other)),
            },
            Schema::String => match value {
                Value::String(_) => Status::Valid,
                other => self.invalid_type(path, issues, type_name(other)),
            },
            Schema::Number { min, max } => match value.as_f64() {
                Some(number) => {
                    let mut status = Status::Valid;
                    if let Some(minimum) = *min {
                        if number < minimum {
                            push(path, issues, IssueKind::TooSmall { minimum });
                            status = Status::Dirty;
                        }
                    }
                    if let Some(maximum) = *max {
                        if number > maximum {
                            push(path, issues, IssueKind::TooBig { maximum });
                            status = Status::Dirty;
                        }
                    }
                    status
                }
                None => self.invalid_type(path, issues, type_name(value)),
            },
            Schema::Literal(literal) => match value {
                Value::String(s) if s == *literal => Status::Valid,
                other => self.invalid_type(path, issues, type_name(other)),
            },
            Schema::Enum(options) => match value {
                Value::String(s) if options.contains(&s.as_str()) => Status::Valid,
                Value::String(s) => {
                    push(
                        path,
                        issues,
                        IssueKind::InvalidEnumValue {
                            options: *options,
                            received: s.clone(),
                        },
                    );
                    Status::Aborted
                }
                other => self.invalid_type(path, issues, type_name(other)),
            },
            Schema::Array(item) => match value {
                Value::Array(items) => {
                    let mut status = Status::Valid;
                    for (index, element) in items.iter().enumerate() {
                        path.push(PathSegment::Index(index));
                        status = status.max(item.check(Some(element), path, issues));
                        path.pop();
                    }
                    status
                }
                other => self.invalid_type(path, issues, type_name(other)),
            },
            Schema::Tuple(items) => match value {
                Value::Array(elements) if elements.len() < items.len() => {
                    push(
                        path,
                        issues,
                        IssueKind::TooSmall {
                            minimum: items.len() as f64,
                        },
                    );
                    Status::Aborted
                }
                Value::Array(elements) if elements.len() > items.len() => {
                    push(
                        path,
                        issues,
                        IssueKind::TooBig {
                            maximum: items.len() as f64,
                        },
                    );
                    Status::Aborted
                }
                Value::Array(elements) => {
                    let mut status = Status::Valid;
                    for (index, (item, element)) in items.iter().zip(elements).enumerate() {
                        path.push(PathSegment::Index(index));
                        status = status.max(item.check(Some(element), path, issues));
                        path.pop();
                    }
                    status
                }
                other => self.invalid_type(path, issues, type_name(other)),
            },
            Schema::Record(inner) => match value {
                Value::Object(map) => {
                    let mut status = Status::Valid;
                    for (key, element) in map {
                        path.push(PathSegment::Key(key.clone()));
                        status = status.max(inner.check(Some(element), path, issues));
                        path.pop();
                    }
                    status
                }
                other => self.invalid_type(path, issues, type_name(other)),
            },
            Schema::Object(fields) => match value {
                Value::Object(map) => {
                    let mut status = Status::Valid;
                    for field in fields {
                        let element = map.get(field.name);
                        if element.is_none() && !field.required {
                            continue;
                        }
                        path.push(PathSegment::Key(field.name.to_string()));
                        status = status.max(field.schema.check(element, path, issues));
                        path.pop();
                    }
                    status
                }
                other => self.invalid_type(path, issues, type_name(other)),
            },
            Schema::Union(options) => {
                let mut branches = Vec::with_capacity(options.len());
                let mut dirty = None;
                for option in options {
                    let mut branch_issues = Vec::new();
                    match option.check(Some(value), path, &mut branch_issues) {
                        Status::Valid => return Status::Valid,
                        Status::Dirty if dirty.is_none() => {
                            dirty = Some(branch_issues.clone());
                        }
                        _ => {}
                    }
                    branches.push(ParseError {
                        issues: branch_issues,
                    });
                }
                if let Some(dirty) = dirty {
                    // The first branch that only failed a refinement is what
                    // the user meant, report it directly.
                    issues.extend(dirty);
                    return Status::Dirty;
                }
                push(path, issues, IssueKind::InvalidUnion { branches });
                Status::Aborted
            }
            Schema::Refine(inner, refinement) => match inner.check(Some(value), path, issues) {
                Status::Valid => match refinement(value) {
                    Ok(()) => Status::Valid,
                    Err(message) => {
                        push(path, issues, IssueKind::Custom { message });
                        Status::Dirty
                    }
                },
                status => status,
            },
            Schema::Ref(inner) => inner.check(Some(value), path, issues),
        }
    }

    fn invalid_type(
        &self,
        path: &[PathSegment],
        issues: &mut Vec<Issue>,
        received: &'static str,
    ) -> Status {
        push(
            path,
            issues,
            IssueKind::InvalidType {
                expected: self.expected(),
                received,
            },
        );
        Status::Aborted
    }
}

fn push(path: &[PathSegment], issues: &mut Vec<Issue>, kind: IssueKind) {
    issues.push(Issue {
        path: path.to_vec(),
        kind,
    });
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
