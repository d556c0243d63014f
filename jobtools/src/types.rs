//! Declared parameter types and the values they coerce into
//!
//! Parameter types are a closed set ([`DeclaredType`]) with two open ends:
//! enumerations, described by a [`ChoiceTable`] built from any [`StringEnum`],
//! and user types, described by a registered converter.

use jobtools_config::NestedNamespace;
use serde::ser::{Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Enumerations whose command-line token is a custom string
///
/// The external string, not the identifier, is what users type and what help
/// output lists. Use [`string_enum!`](crate::string_enum) to define one.
pub trait StringEnum: Sized + Copy + PartialEq + 'static {
    /// Name shown in help and error messages
    const TYPE_NAME: &'static str;

    /// Every member, in declaration order
    fn members() -> &'static [Self];

    /// Programmatic name of the member
    fn identifier(&self) -> &'static str;

    /// External string of the member
    fn value(&self) -> &'static str;

    fn from_value(value: &str) -> Option<Self> {
        Self::members()
            .iter()
            .copied()
            .find(|member| member.value() == value)
    }
}

/// Defines an enum together with its [`StringEnum`] mapping
///
/// ```
/// jobtools::string_enum! {
///     pub enum CompareStrategy {
///         BiggerBetter => "Bigger is better",
///         SmallerBetter => "Smaller is better",
///     }
/// }
///
/// use jobtools::StringEnum;
/// assert_eq!(CompareStrategy::from_value("Bigger is better"), Some(CompareStrategy::BiggerBetter));
/// assert_eq!(CompareStrategy::SmallerBetter.to_string(), "Smaller is better");
/// ```
///
/// The generated type derives `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq` and `Hash`.
#[macro_export]
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::StringEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn members() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn identifier(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            fn value(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::StringEnum::value(self))
            }
        }

        impl $crate::FromArgValue for $name {
            fn from_arg_value(value: &$crate::ArgValue) -> ::std::option::Option<Self> {
                match value {
                    $crate::ArgValue::Choice(choice) => choice.to_enum::<Self>(),
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl ::std::convert::From<$name> for $crate::ArgValue {
            fn from(member: $name) -> Self {
                $crate::ArgValue::Choice($crate::ChoiceValue::of(member))
            }
        }
    };
}

/// One member of a choice table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceMember {
    pub identifier: String,
    pub value: String,
}

/// Closed member ↔ external-string table for an enumerated type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceTable {
    type_name: String,
    members: Vec<ChoiceMember>,
}

impl ChoiceTable {
    /// Build a table from `(identifier, value)` pairs
    pub fn new<I, K, V>(type_name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            type_name: type_name.into(),
            members: members
                .into_iter()
                .map(|(identifier, value)| ChoiceMember {
                    identifier: identifier.into(),
                    value: value.into(),
                })
                .collect(),
        }
    }

    pub fn of<E: StringEnum>() -> Self {
        Self::new(
            E::TYPE_NAME,
            E::members()
                .iter()
                .map(|member| (member.identifier(), member.value())),
        )
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn members(&self) -> &[ChoiceMember] {
        &self.members
    }

    /// External strings, in declaration order
    pub fn values(&self) -> Vec<String> {
        self.members.iter().map(|m| m.value.clone()).collect()
    }

    /// Exact, case-sensitive match on the external string
    pub fn lookup(&self, token: &str) -> Option<ChoiceValue> {
        self.members
            .iter()
            .find(|member| member.value == token)
            .map(|member| ChoiceValue {
                type_name: self.type_name.clone(),
                identifier: member.identifier.clone(),
                value: member.value.clone(),
            })
    }
}

/// A selected member of an enumerated type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceValue {
    pub type_name: String,
    pub identifier: String,
    pub value: String,
}

impl ChoiceValue {
    pub fn of<E: StringEnum>(member: E) -> Self {
        Self {
            type_name: E::TYPE_NAME.to_string(),
            identifier: member.identifier().to_string(),
            value: member.value().to_string(),
        }
    }

    /// Back to the concrete enum, if this value belongs to it
    pub fn to_enum<E: StringEnum>(&self) -> Option<E> {
        if self.type_name != E::TYPE_NAME {
            return None;
        }
        E::members()
            .iter()
            .copied()
            .find(|member| member.identifier() == self.identifier)
    }
}

/// Converter from a raw token to a user type
pub type Converter = Arc<dyn Fn(&str) -> Result<Arc<dyn Any + Send + Sync>, String> + Send + Sync>;

/// A type outside the built-in set, constructed by a registered converter
#[derive(Clone)]
pub struct UserType {
    name: String,
    converter: Converter,
}

impl UserType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn convert(&self, raw: &str) -> Result<CustomValue, String> {
        (self.converter)(raw).map(|value| CustomValue {
            type_name: self.name.clone(),
            raw: raw.to_string(),
            value,
        })
    }
}

impl fmt::Debug for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserType").field("name", &self.name).finish()
    }
}

/// Value produced by a [`UserType`] converter
///
/// Two custom values are equal when they share a type and came from the same
/// token.
#[derive(Clone)]
pub struct CustomValue {
    type_name: String,
    raw: String,
    value: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    pub fn new<T: Any + Send + Sync>(
        type_name: impl Into<String>,
        raw: impl Into<String>,
        value: T,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            raw: raw.into(),
            value: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Token the value was built from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.raw == other.raw
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("type_name", &self.type_name)
            .field("raw", &self.raw)
            .finish()
    }
}

/// The declared type of a parameter
#[derive(Debug, Clone)]
pub enum DeclaredType {
    Boolean,
    Integer,
    Float,
    String,
    /// Delimited string split into trimmed items
    List,
    Enum(Arc<ChoiceTable>),
    /// Loaded from a YAML or JSON file
    Namespace,
    User(UserType),
}

impl DeclaredType {
    pub fn enumeration<E: StringEnum>() -> Self {
        DeclaredType::Enum(Arc::new(ChoiceTable::of::<E>()))
    }

    /// Any `FromStr` type, named after its last path segment
    pub fn user<T>() -> Self
    where
        T: FromStr + Send + Sync + 'static,
        T::Err: fmt::Display,
    {
        let full = std::any::type_name::<T>();
        let short = full.rsplit("::").next().unwrap_or(full);
        Self::user_named::<T>(short)
    }

    pub fn user_named<T>(name: impl Into<String>) -> Self
    where
        T: FromStr + Send + Sync + 'static,
        T::Err: fmt::Display,
    {
        Self::user_with(name, |raw: &str| {
            raw.parse::<T>()
                .map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>)
                .map_err(|e| e.to_string())
        })
    }

    /// Register an arbitrary converter under `name`
    pub fn user_with<F>(name: impl Into<String>, converter: F) -> Self
    where
        F: Fn(&str) -> Result<Arc<dyn Any + Send + Sync>, String> + Send + Sync + 'static,
    {
        DeclaredType::User(UserType {
            name: name.into(),
            converter: Arc::new(converter),
        })
    }

    /// Type name as shown in help text and errors
    pub fn name(&self) -> &str {
        match self {
            DeclaredType::Boolean => "bool",
            DeclaredType::Integer => "int",
            DeclaredType::Float => "float",
            DeclaredType::String => "str",
            DeclaredType::List => "list",
            DeclaredType::Enum(table) => table.type_name(),
            DeclaredType::Namespace => "namespace",
            DeclaredType::User(user) => user.name(),
        }
    }

    /// Legal tokens for enumerated types
    pub fn choices(&self) -> Option<Vec<String>> {
        match self {
            DeclaredType::Enum(table) => Some(table.values()),
            _ => None,
        }
    }

    /// Whether an already-typed value belongs to this type
    pub fn accepts(&self, value: &ArgValue) -> bool {
        match (self, value) {
            (DeclaredType::Boolean, ArgValue::Bool(_))
            | (DeclaredType::Integer, ArgValue::Int(_))
            | (DeclaredType::Float, ArgValue::Float(_))
            | (DeclaredType::String, ArgValue::Str(_))
            | (DeclaredType::List, ArgValue::List(_))
            | (DeclaredType::Namespace, ArgValue::Namespace(_)) => true,
            (DeclaredType::Enum(table), ArgValue::Choice(choice)) => {
                choice.type_name == table.type_name() && table.lookup(&choice.value).is_some()
            }
            (DeclaredType::User(user), ArgValue::Custom(custom)) => {
                custom.type_name() == user.name()
            }
            _ => false,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully coerced parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<String>),
    Choice(ChoiceValue),
    Namespace(NestedNamespace),
    Custom(CustomValue),
}

impl ArgValue {
    /// Kind of value, for mismatch messages
    pub fn kind(&self) -> &str {
        match self {
            ArgValue::Bool(_) => "bool",
            ArgValue::Int(_) => "int",
            ArgValue::Float(_) => "float",
            ArgValue::Str(_) => "str",
            ArgValue::List(_) => "list",
            ArgValue::Choice(choice) => &choice.type_name,
            ArgValue::Namespace(_) => "namespace",
            ArgValue::Custom(custom) => custom.type_name(),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Bool(value) => write!(f, "{value}"),
            ArgValue::Int(value) => write!(f, "{value}"),
            ArgValue::Float(value) => write!(f, "{value}"),
            ArgValue::Str(value) => f.write_str(value),
            ArgValue::List(values) => f.write_str(&values.join(",")),
            ArgValue::Choice(choice) => f.write_str(&choice.value),
            ArgValue::Namespace(namespace) => write!(f, "{}", namespace.to_json()),
            ArgValue::Custom(custom) => f.write_str(custom.raw()),
        }
    }
}

impl Serialize for ArgValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ArgValue::Bool(value) => serializer.serialize_bool(*value),
            ArgValue::Int(value) => serializer.serialize_i64(*value),
            ArgValue::Float(value) => serializer.serialize_f64(*value),
            ArgValue::Str(value) => serializer.serialize_str(value),
            ArgValue::List(values) => values.serialize(serializer),
            ArgValue::Choice(choice) => serializer.serialize_str(&choice.value),
            ArgValue::Namespace(namespace) => namespace.serialize(serializer),
            ArgValue::Custom(custom) => serializer.serialize_str(custom.raw()),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(value.into())
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(values: Vec<String>) -> Self {
        ArgValue::List(values)
    }
}

impl From<ChoiceValue> for ArgValue {
    fn from(value: ChoiceValue) -> Self {
        ArgValue::Choice(value)
    }
}

impl From<NestedNamespace> for ArgValue {
    fn from(value: NestedNamespace) -> Self {
        ArgValue::Namespace(value)
    }
}

impl From<CustomValue> for ArgValue {
    fn from(value: CustomValue) -> Self {
        ArgValue::Custom(value)
    }
}

/// Typed extraction out of an [`ArgValue`]
pub trait FromArgValue: Sized {
    fn from_arg_value(value: &ArgValue) -> Option<Self>;
}

impl FromArgValue for bool {
    fn from_arg_value(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromArgValue for i64 {
    fn from_arg_value(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Int(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromArgValue for f64 {
    fn from_arg_value(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromArgValue for String {
    fn from_arg_value(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Str(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl FromArgValue for Vec<String> {
    fn from_arg_value(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::List(values) => Some(values.clone()),
            _ => None,
        }
    }
}

impl FromArgValue for ChoiceValue {
    fn from_arg_value(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Choice(choice) => Some(choice.clone()),
            _ => None,
        }
    }
}

impl FromArgValue for NestedNamespace {
    fn from_arg_value(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Namespace(namespace) => Some(namespace.clone()),
            _ => None,
        }
    }
}
