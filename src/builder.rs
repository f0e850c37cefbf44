//! Fluent construction of the document model.
//!
//! The builders in this module only instantiate [`ast`](crate::ast) nodes and
//! append to their collections; all formatting lives in the encoder. They can
//! be bypassed entirely by populating the model structs directly, with no
//! effect on the encoded output.

use crate::ast::{
    Enum, EnumValue, Extend, Field, FieldLabel, File, Import, ImportKind, Message, MessageLiteral,
    MessageLiteralField, Method, Oneof, Service, Value,
};

impl Field {
    /// Creates a field with the given type, name and number.
    pub fn new(
        ty: impl Into<String>,
        name: impl Into<String>,
        number: i32,
    ) -> Self {
        Field {
            label: None,
            ty: ty.into(),
            name: name.into(),
            number,
            options: Vec::new(),
        }
    }

    /// Creates a `string` field.
    pub fn string(name: impl Into<String>, number: i32) -> Self {
        Field::new("string", name, number)
    }

    /// Creates a `uint64` field.
    pub fn uint64(name: impl Into<String>, number: i32) -> Self {
        Field::new("uint64", name, number)
    }

    /// Sets the field's cardinality label.
    pub fn label(mut self, label: FieldLabel) -> Self {
        self.label = Some(label);
        self
    }

    /// Appends a compact option, rendered in brackets after the field number.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.push(crate::ast::Option {
            name: name.into(),
            value: value.into(),
            compact: true,
        });
        self
    }
}

impl Method {
    /// Creates a method with the given name, input type and output type.
    pub fn new(
        name: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Method {
            name: name.into(),
            input: input.into(),
            output: output.into(),
            options: Vec::new(),
        }
    }

    /// Appends a method option, rendered in a block before the closing `;`.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.push(crate::ast::Option {
            name: name.into(),
            value: value.into(),
            compact: false,
        });
        self
    }
}

/// Builds a [`File`].
#[derive(Debug, Default)]
pub struct FileBuilder {
    file: File,
}

impl FileBuilder {
    /// Creates an empty file builder.
    pub fn new() -> Self {
        FileBuilder::default()
    }

    /// Sets the package name.
    pub fn package(mut self, name: impl Into<String>) -> Self {
        self.file.package = name.into();
        self
    }

    /// Appends an import declaration.
    pub fn import(mut self, path: impl Into<String>, kind: Option<ImportKind>) -> Self {
        self.file.imports.push(Import {
            path: path.into(),
            kind,
        });
        self
    }

    /// Appends a file-level option.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.file.options.push(crate::ast::Option {
            name: name.into(),
            value: value.into(),
            compact: false,
        });
        self
    }

    /// Appends a top-level extension block.
    pub fn extend(mut self, extend: Extend) -> Self {
        self.file.extends.push(extend);
        self
    }

    /// Appends a top-level message.
    pub fn message(mut self, message: Message) -> Self {
        self.file.messages.push(message);
        self
    }

    /// Appends a top-level enum.
    pub fn enum_(mut self, value: Enum) -> Self {
        self.file.enums.push(value);
        self
    }

    /// Appends a service declaration.
    pub fn service(mut self, service: Service) -> Self {
        self.file.services.push(service);
        self
    }

    /// Returns the finished file.
    pub fn build(self) -> File {
        self.file
    }
}

/// Builds a [`Message`].
#[derive(Debug)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    /// Creates a builder for a message with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        MessageBuilder {
            message: Message {
                name: name.into(),
                ..Message::default()
            },
        }
    }

    /// Appends a oneof group.
    pub fn oneof(mut self, oneof: Oneof) -> Self {
        self.message.oneofs.push(oneof);
        self
    }

    /// Appends a nested extension block.
    pub fn extend(mut self, extend: Extend) -> Self {
        self.message.extends.push(extend);
        self
    }

    /// Appends a message-level option.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.message.options.push(crate::ast::Option {
            name: name.into(),
            value: value.into(),
            compact: false,
        });
        self
    }

    /// Appends a nested enum.
    pub fn enum_(mut self, value: Enum) -> Self {
        self.message.enums.push(value);
        self
    }

    /// Appends a nested message.
    pub fn message(mut self, message: Message) -> Self {
        self.message.messages.push(message);
        self
    }

    /// Appends a field.
    pub fn field(mut self, field: Field) -> Self {
        self.message.fields.push(field);
        self
    }

    /// Returns the finished message.
    pub fn build(self) -> Message {
        self.message
    }
}

/// Builds an [`Enum`].
#[derive(Debug)]
pub struct EnumBuilder {
    value: Enum,
}

impl EnumBuilder {
    /// Creates a builder for an enum with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        EnumBuilder {
            value: Enum {
                name: name.into(),
                ..Enum::default()
            },
        }
    }

    /// Sets the enum's leading comment.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.value.comment = Some(comment.into());
        self
    }

    /// Appends a value.
    pub fn value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.value.values.push(EnumValue {
            name: name.into(),
            number,
            comment: None,
        });
        self
    }

    /// Returns the finished enum.
    pub fn build(self) -> Enum {
        self.value
    }
}

/// Builds a [`Oneof`].
#[derive(Debug)]
pub struct OneofBuilder {
    oneof: Oneof,
}

impl OneofBuilder {
    /// Creates a builder for a oneof with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        OneofBuilder {
            oneof: Oneof {
                name: name.into(),
                ..Oneof::default()
            },
        }
    }

    /// Appends a member field.
    pub fn field(mut self, field: Field) -> Self {
        self.oneof.fields.push(field);
        self
    }

    /// Returns the finished oneof.
    pub fn build(self) -> Oneof {
        self.oneof
    }
}

/// Builds an [`Extend`] block.
#[derive(Debug)]
pub struct ExtendBuilder {
    extend: Extend,
}

impl ExtendBuilder {
    /// Creates a builder for an extension block on the given type.
    pub fn new(extendee: impl Into<String>) -> Self {
        ExtendBuilder {
            extend: Extend {
                extendee: extendee.into(),
                ..Extend::default()
            },
        }
    }

    /// Appends an extension field.
    pub fn field(mut self, field: Field) -> Self {
        self.extend.fields.push(field);
        self
    }

    /// Returns the finished extension block.
    pub fn build(self) -> Extend {
        self.extend
    }
}

/// Builds a [`Service`].
#[derive(Debug)]
pub struct ServiceBuilder {
    service: Service,
}

impl ServiceBuilder {
    /// Creates a builder for a service with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        ServiceBuilder {
            service: Service {
                name: name.into(),
                ..Service::default()
            },
        }
    }

    /// Appends a method.
    pub fn method(mut self, method: Method) -> Self {
        self.service.methods.push(method);
        self
    }

    /// Appends a method with the given name, input type and output type.
    pub fn rpc(
        self,
        name: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        self.method(Method::new(name, input, output))
    }

    /// Returns the finished service.
    pub fn build(self) -> Service {
        self.service
    }
}

/// Builds a [`MessageLiteral`].
#[derive(Debug, Default)]
pub struct MessageLiteralBuilder {
    literal: MessageLiteral,
}

impl MessageLiteralBuilder {
    /// Creates an empty literal builder.
    pub fn new() -> Self {
        MessageLiteralBuilder::default()
    }

    /// Renders the literal's fields on a single line.
    pub fn single_line(mut self) -> Self {
        self.literal.single_line = true;
        self
    }

    /// Appends a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.literal.fields.push(MessageLiteralField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Returns the finished literal.
    pub fn build(self) -> MessageLiteral {
        self.literal
    }
}
