use std::collections::BTreeMap;
use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};

use crate::errors::{AgentError, AgentResult};

/// The primitive kinds a tool parameter can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParamType {
    Int,
    Str,
    Bool,
    Float,
}

impl ParamType {
    /// Convert `value` to this kind, leaving values that already match untouched.
    pub fn coerce(self, argument: &str, value: &Value) -> AgentResult<Value> {
        let coerced = match self {
            ParamType::Int => coerce_int(value),
            ParamType::Str => Some(coerce_str(value)),
            ParamType::Bool => coerce_bool(value),
            ParamType::Float => coerce_float(value),
        };

        coerced.ok_or_else(|| AgentError::Coercion {
            argument: argument.to_string(),
            expected: self,
            value: value.to_string(),
        })
    }
}

fn coerce_int(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) => n.as_i64().map(Value::from).or_else(|| {
            n.as_f64()
                .filter(|f| (i64::MIN as f64..i64::MAX as f64).contains(f))
                .map(|f| Value::from(f.trunc() as i64))
        }),
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
        Value::Bool(b) => Some(Value::from(i64::from(*b))),
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<Value> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).map(Value::from)
}

fn coerce_str(value: &Value) -> Value {
    match value {
        Value::String(_) => value.clone(),
        other => Value::String(other.to_string()),
    }
}

fn coerce_bool(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(Value::Bool(true)),
            "false" | "0" | "no" => Some(Value::Bool(false)),
            _ => None,
        },
        Value::Number(n) => n.as_f64().map(|f| Value::Bool(f != 0.0)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    pub kind: ParamType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub properties: BTreeMap<String, ParamSpec>,
}

/// The signature of a tool as presented to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Parameters,
}

impl ToolSchema {
    pub fn new<N, P, S>(name: N, description: Option<String>, parameters: P) -> Self
    where
        N: Into<String>,
        P: IntoIterator<Item = (S, ParamType)>,
        S: Into<String>,
    {
        let properties = parameters
            .into_iter()
            .map(|(name, kind)| (name.into(), ParamSpec { kind }))
            .collect();

        Self {
            name: name.into(),
            description,
            parameters: Parameters { properties },
        }
    }

    /// Load a schema from its JSON signature. Parameter types outside the
    /// supported kinds are rejected here rather than at call time.
    pub fn from_signature(signature: &str) -> AgentResult<Self> {
        serde_json::from_str(signature)
            .map_err(|e| AgentError::InvalidConfig(format!("invalid tool signature: {e}")))
    }

    pub fn param_type(&self, name: &str) -> Option<ParamType> {
        self.parameters.properties.get(name).map(|spec| spec.kind)
    }

    /// The JSON signature shown to the model
    pub fn signature(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ToolSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// A tool invocation requested by the model inside a `<tool_call>` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
    pub id: i64,
}

impl ToolCall {
    pub fn parse(span: &str) -> AgentResult<Self> {
        serde_json::from_str(span)
            .map_err(|e| AgentError::MalformedToolCall(format!("{e}: {span}")))
    }
}

/// Arguments that have been checked against a [`ToolSchema`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArgs(Map<String, Value>);

impl ValidatedArgs {
    pub fn get<T: ToolArg>(&self, name: &str) -> AgentResult<T> {
        let value = self
            .0
            .get(name)
            .ok_or_else(|| AgentError::InvalidParameters(format!("missing argument '{name}'")))?;

        T::from_value(value).ok_or_else(|| AgentError::Coercion {
            argument: name.to_string(),
            expected: T::KIND,
            value: value.to_string(),
        })
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Coerce every supplied argument to the type its schema declares.
pub fn validate_arguments(
    arguments: &Map<String, Value>,
    schema: &ToolSchema,
) -> AgentResult<ValidatedArgs> {
    let mut validated = Map::new();
    for (name, value) in arguments {
        let kind = schema.param_type(name).ok_or_else(|| {
            AgentError::InvalidParameters(format!(
                "unexpected argument '{}' for tool '{}'",
                name, schema.name
            ))
        })?;
        validated.insert(name.clone(), kind.coerce(name, value)?);
    }
    Ok(ValidatedArgs(validated))
}

/// Rust types usable as tool parameters
pub trait ToolArg: Sized {
    const KIND: ParamType;

    fn from_value(value: &Value) -> Option<Self>;
}

impl ToolArg for i64 {
    const KIND: ParamType = ParamType::Int;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl ToolArg for f64 {
    const KIND: ParamType = ParamType::Float;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl ToolArg for bool {
    const KIND: ParamType = ParamType::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl ToolArg for String {
    const KIND: ParamType = ParamType::Str;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

/// A capability the model can call by name
pub trait Tool: Send + Sync {
    fn schema(&self) -> &ToolSchema;

    /// Execute with arguments already coerced to the schema
    fn invoke(&self, args: &ValidatedArgs) -> AgentResult<Value>;

    fn name(&self) -> &str {
        &self.schema().name
    }

    fn description(&self) -> Option<&str> {
        self.schema().description.as_deref()
    }

    /// Validate raw model-supplied arguments, then invoke.
    fn run(&self, arguments: &Map<String, Value>) -> AgentResult<Value> {
        let args = validate_arguments(arguments, self.schema())?;
        self.invoke(&args)
    }
}

type ToolFn = Box<dyn Fn(&ValidatedArgs) -> AgentResult<Value> + Send + Sync>;

/// A tool backed by a closure
pub struct FunctionTool {
    schema: ToolSchema,
    function: ToolFn,
}

impl FunctionTool {
    pub fn new<N, P, S, F>(name: N, description: Option<String>, parameters: P, function: F) -> Self
    where
        N: Into<String>,
        P: IntoIterator<Item = (S, ParamType)>,
        S: Into<String>,
        F: Fn(&ValidatedArgs) -> AgentResult<Value> + Send + Sync + 'static,
    {
        Self {
            schema: ToolSchema::new(name, description, parameters),
            function: Box::new(function),
        }
    }
}

impl Tool for FunctionTool {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    fn invoke(&self, args: &ValidatedArgs) -> AgentResult<Value> {
        (self.function)(args)
    }
}

impl Debug for FunctionTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTool")
            .field("schema", &self.schema)
            .field("function", &"<function>")
            .finish()
    }
}

/// Join doc comment lines into a tool description.
#[doc(hidden)]
pub fn doc_description(lines: &[&str]) -> Option<String> {
    let description = lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n");
    let description = description.trim();
    (!description.is_empty()).then(|| description.to_string())
}

#[doc(hidden)]
pub fn to_output<T: Serialize>(value: T) -> AgentResult<Value> {
    serde_json::to_value(value).map_err(|e| AgentError::ExecutionError(e.to_string()))
}

/// Turn a function item into a [`FunctionTool`].
///
/// The tool name is the function name, the description is its doc comment and
/// each parameter's kind comes from its Rust type (`i64`, `f64`, `bool` or
/// `String`). The return value must be serializable. A function declared to
/// return `AgentResult<T>` may fail; its error becomes the tool's error.
///
/// ```
/// use agentic::errors::AgentError;
/// use agentic::tool::Tool;
///
/// let add = agentic::tool! {
///     /// Add two numbers together
///     fn add(a: i64, b: i64) -> i64 {
///         a + b
///     }
/// };
/// assert_eq!(add.schema().name, "add");
///
/// let divide = agentic::tool! {
///     /// Divide a by b
///     fn divide(a: i64, b: i64) -> AgentResult<i64> {
///         a.checked_div(b)
///             .ok_or_else(|| AgentError::ExecutionError("division by zero".to_string()))
///     }
/// };
/// assert_eq!(divide.schema().name, "divide");
/// ```
#[macro_export]
macro_rules! tool {
    (
        $(#[doc = $doc:literal])*
        fn $name:ident ( $( $arg:ident : $ty:ty ),* $(,)? ) -> AgentResult<$ret:ty> $body:block
    ) => {{
        fn $name( $( $arg: $ty ),* ) -> $crate::errors::AgentResult<$ret> $body

        let parameters: ::std::vec::Vec<(&str, $crate::tool::ParamType)> = vec![
            $( (stringify!($arg), <$ty as $crate::tool::ToolArg>::KIND) ),*
        ];

        $crate::tool::FunctionTool::new(
            stringify!($name),
            $crate::tool::doc_description(&[$($doc),*]),
            parameters,
            move |_args: &$crate::tool::ValidatedArgs| {
                let output = $name( $( _args.get::<$ty>(stringify!($arg))? ),* )?;
                $crate::tool::to_output(output)
            },
        )
    }};
    (
        $(#[doc = $doc:literal])*
        fn $name:ident ( $( $arg:ident : $ty:ty ),* $(,)? ) -> $ret:ty $body:block
    ) => {{
        fn $name( $( $arg: $ty ),* ) -> $ret $body

        let parameters: ::std::vec::Vec<(&str, $crate::tool::ParamType)> = vec![
            $( (stringify!($arg), <$ty as $crate::tool::ToolArg>::KIND) ),*
        ];

        $crate::tool::FunctionTool::new(
            stringify!($name),
            $crate::tool::doc_description(&[$($doc),*]),
            parameters,
            move |_args: &$crate::tool::ValidatedArgs| {
                let output = $name( $( _args.get::<$ty>(stringify!($arg))? ),* );
                $crate::tool::to_output(output)
            },
        )
    }};
}
