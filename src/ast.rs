//! The document model for a protobuf source file.
//!
//! All nodes are plain records populated by the caller, either directly or
//! through the [`builder`](crate::builder) module. The model enforces no
//! invariants: field numbers are not checked for uniqueness, type names are
//! not resolved, and identifiers are not validated. An empty child collection
//! is indistinguishable from "no such declarations" and the corresponding
//! output section is omitted entirely.

/// A protobuf source file, the root of the document model.
///
/// Children are encoded in the order of the struct fields below. Imports,
/// extension blocks, messages, enums and services preserve their declaration
/// order within their own collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct File {
    /// The package name declared by the file.
    pub package: String,
    /// Import declarations.
    pub imports: Vec<Import>,
    /// File-level options.
    pub options: Vec<Option>,
    /// Top-level extension blocks.
    pub extends: Vec<Extend>,
    /// Top-level messages.
    pub messages: Vec<Message>,
    /// Top-level enums.
    pub enums: Vec<Enum>,
    /// Service declarations.
    pub services: Vec<Service>,
}

/// An `import` declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    /// The imported file path, without quotes.
    pub path: String,
    /// The import visibility, or `None` for a plain import.
    pub kind: std::option::Option<ImportKind>,
}

/// The visibility modifier of an [`Import`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ImportKind {
    /// `import public "...";`
    Public,
    /// `import weak "...";`
    Weak,
}

/// An option declaration.
///
/// Encoded either as a standalone `option <name> = <value>;` statement, or,
/// if `compact` is set, as a `<name> = <value>` fragment inside the `[...]`
/// list attached to a field or the block attached to a method.
///
/// No check whatsoever is performed on the option syntax; the caller is
/// responsible for parenthesizing extension names, quoting strings and so on.
#[derive(Clone, Debug, PartialEq)]
pub struct Option {
    /// The option name, e.g. `deprecated` or `(my.custom.option)`.
    pub name: String,
    /// The option value.
    pub value: Value,
    /// Whether this option is rendered in the compact bracketed form.
    pub compact: bool,
}

/// The value of an option or message-literal field.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A literal token written verbatim.
    ///
    /// No quoting or escaping is applied, so this doubles as the
    /// representation for identifier constants such as enum values. String
    /// values destined for the schema must be supplied already quoted.
    String(String),
    /// An integer literal.
    Int(i64),
    /// A boolean literal.
    Bool(bool),
    /// A nested message literal.
    Message(MessageLiteral),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<MessageLiteral> for Value {
    fn from(value: MessageLiteral) -> Self {
        Value::Message(value)
    }
}

/// A message literal used as an option value, e.g.
/// `{ name: "foo" id: 42 }`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageLiteral {
    /// If set, fields are separated by single spaces on one line instead of
    /// being placed on their own indented lines.
    pub single_line: bool,
    /// The literal's fields, in declaration order.
    pub fields: Vec<MessageLiteralField>,
}

/// A single `<name>: <value>` entry of a [`MessageLiteral`].
#[derive(Clone, Debug, PartialEq)]
pub struct MessageLiteralField {
    /// The field name.
    pub name: String,
    /// The field value, possibly a further nested literal.
    pub value: Value,
}

/// A message declaration.
///
/// Children are encoded in a fixed order independent of how the collections
/// were populated: oneofs, extension blocks, options, nested enums, nested
/// messages, then fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Message {
    /// The message name.
    pub name: String,
    /// Oneof groups.
    pub oneofs: Vec<Oneof>,
    /// Nested extension blocks.
    pub extends: Vec<Extend>,
    /// Message-level options.
    pub options: Vec<Option>,
    /// Nested enums.
    pub enums: Vec<Enum>,
    /// Nested messages.
    pub messages: Vec<Message>,
    /// The message's fields.
    pub fields: Vec<Field>,
}

/// A field declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// The cardinality label, or `None` for the default cardinality.
    pub label: std::option::Option<FieldLabel>,
    /// The field's type name, written verbatim and never resolved.
    pub ty: String,
    /// The field name.
    pub name: String,
    /// The field number. Uniqueness is not enforced.
    pub number: i32,
    /// Compact options rendered in brackets after the field number.
    pub options: Vec<Option>,
}

/// The cardinality of a [`Field`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FieldLabel {
    /// `required`, proto2 only.
    Required,
    /// `optional`
    Optional,
    /// `repeated`
    Repeated,
}

/// A oneof group.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Oneof {
    /// The oneof name.
    pub name: String,
    /// Member fields, in declaration order. Oneof members must have the
    /// default cardinality; this is not enforced.
    pub fields: Vec<Field>,
}

/// An enum declaration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Enum {
    /// The enum name.
    pub name: String,
    /// The enum's values, in declaration order.
    pub values: Vec<EnumValue>,
    /// An optional leading comment, written as `//` lines above the
    /// declaration.
    pub comment: std::option::Option<String>,
}

/// A single value of an [`Enum`].
#[derive(Clone, Debug, PartialEq)]
pub struct EnumValue {
    /// The value name.
    pub name: String,
    /// The value's number.
    pub number: i32,
    /// An optional trailing comment. Line breaks are flattened to spaces.
    pub comment: std::option::Option<String>,
}

/// An `extend` block adding fields to a type defined elsewhere.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extend {
    /// The name of the extended type.
    pub extendee: String,
    /// The extension fields, in declaration order.
    pub fields: Vec<Field>,
}

/// A service declaration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Service {
    /// The service name.
    pub name: String,
    /// The service's methods, in declaration order.
    pub methods: Vec<Method>,
}

/// A single rpc method of a [`Service`].
#[derive(Clone, Debug, PartialEq)]
pub struct Method {
    /// The method name.
    pub name: String,
    /// The input type name.
    pub input: String,
    /// The output type name.
    pub output: String,
    /// Method-level options, rendered in a block before the closing `;`.
    pub options: Vec<Option>,
}
