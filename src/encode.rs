//! Encoding of the document model to protobuf source text.
//!
//! Each node kind has one encode operation. Container kinds visit their
//! children in a fixed order, passing a deepened [`Context`] to each nested
//! scope, and wrap any child failure with its position before propagating it.
//! Output is a pure function of the tree and the configured indentation unit.

use std::io::Write;

use crate::ast::{
    Enum, EnumValue, Extend, Field, FieldLabel, File, Import, ImportKind, Message, MessageLiteral,
    MessageLiteralField, Method, Oneof, Service, Value,
};
use crate::error::EncodeErrorKind;

/// Immutable indentation state threaded through the encoder.
///
/// [`deepen`](Context::deepen) derives the context for a nested scope.
/// Dropping the derived value restores the parent's state, so sibling
/// subtrees never observe each other's depth changes.
#[derive(Clone, Debug)]
pub(crate) struct Context {
    indent: String,
    unit: String,
}

impl Context {
    /// Creates a zero-depth context, capturing the indentation unit
    /// configured at this point.
    pub(crate) fn root() -> Self {
        Context {
            indent: String::new(),
            unit: crate::indent_unit(),
        }
    }

    fn deepen(&self) -> Context {
        Context {
            indent: format!("{}{}", self.indent, self.unit),
            unit: self.unit.clone(),
        }
    }

    fn indent(&self) -> &str {
        &self.indent
    }
}

pub(crate) trait Encode {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind>;
}

impl Encode for File {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        write!(dst, "{}syntax = \"proto3\";", ctx.indent())?;
        write!(dst, "\n\n{}package {};", ctx.indent(), self.package)?;

        if !self.imports.is_empty() {
            write!(dst, "\n")?;
            for (i, import) in self.imports.iter().enumerate() {
                import
                    .encode(ctx, dst)
                    .map_err(EncodeErrorKind::element("import", i, &self.package))?;
            }
        }

        if !self.options.is_empty() {
            write!(dst, "\n")?;
            for (i, option) in self.options.iter().enumerate() {
                option
                    .encode(ctx, dst)
                    .map_err(EncodeErrorKind::element("option", i, &self.package))?;
            }
        }

        for (i, extend) in self.extends.iter().enumerate() {
            write!(dst, "\n")?;
            extend
                .encode(ctx, dst)
                .map_err(EncodeErrorKind::element("extend", i, &self.package))?;
        }
        for (i, message) in self.messages.iter().enumerate() {
            write!(dst, "\n")?;
            message
                .encode(ctx, dst)
                .map_err(EncodeErrorKind::element("message", i, &self.package))?;
        }
        for (i, enum_) in self.enums.iter().enumerate() {
            write!(dst, "\n")?;
            enum_
                .encode(ctx, dst)
                .map_err(EncodeErrorKind::element("enum", i, &self.package))?;
        }
        for (i, service) in self.services.iter().enumerate() {
            write!(dst, "\n")?;
            service
                .encode(ctx, dst)
                .map_err(EncodeErrorKind::element("service", i, &self.package))?;
        }

        Ok(())
    }
}

impl Encode for Import {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        write!(dst, "\n{}import", ctx.indent())?;
        match self.kind {
            Some(ImportKind::Public) => write!(dst, " public")?,
            Some(ImportKind::Weak) => write!(dst, " weak")?,
            None => {}
        }
        write!(dst, " \"{}\";", self.path)?;
        Ok(())
    }
}

impl Encode for crate::ast::Option {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        if self.compact {
            // Compact options have no newline and no trailing semicolon; the
            // enclosing field or method supplies the brackets and separators.
            write!(dst, "{} = ", self.name)?;
            return self
                .value
                .encode(ctx, dst)
                .map_err(EncodeErrorKind::element("value", 0, &self.name));
        }

        write!(dst, "\n{}option {} = ", ctx.indent(), self.name)?;
        self.value
            .encode(ctx, dst)
            .map_err(EncodeErrorKind::element("value", 0, &self.name))?;
        write!(dst, ";")?;
        Ok(())
    }
}

impl Encode for Value {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        match self {
            Value::String(value) => write!(dst, "{}", value)?,
            Value::Int(value) => write!(dst, "{}", value)?,
            Value::Bool(value) => write!(dst, "{}", value)?,
            Value::Message(literal) => return literal.encode(ctx, dst),
        }
        Ok(())
    }
}

impl Encode for MessageLiteral {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        write!(dst, "{{")?;
        let inner = ctx.deepen();
        for (i, field) in self.fields.iter().enumerate() {
            if !self.single_line {
                write!(dst, "\n{}", inner.indent())?;
            } else if i > 0 {
                write!(dst, " ")?;
            }
            field
                .encode(&inner, dst)
                .map_err(EncodeErrorKind::element("field", i, "message literal"))?;
        }
        if !self.single_line {
            // The closing brace sits at the literal's own depth, one level
            // shallower than its fields.
            write!(dst, "\n{}", ctx.indent())?;
        }
        write!(dst, "}}")?;
        Ok(())
    }
}

impl Encode for MessageLiteralField {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        write!(dst, "{}: ", self.name)?;
        self.value
            .encode(ctx, dst)
            .map_err(EncodeErrorKind::element("value", 0, &self.name))
    }
}

impl Encode for Oneof {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        write!(dst, "\n{}oneof {} {{", ctx.indent(), self.name)?;
        let inner = ctx.deepen();
        for (i, field) in self.fields.iter().enumerate() {
            field
                .encode(&inner, dst)
                .map_err(EncodeErrorKind::element("field", i, &self.name))?;
        }
        write!(dst, "\n{}}}", ctx.indent())?;
        Ok(())
    }
}

impl Encode for Enum {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        if let Some(comment) = &self.comment {
            for line in comment.lines() {
                write!(dst, "\n{}// {}", ctx.indent(), line)?;
            }
        }
        write!(dst, "\n{}enum {} {{", ctx.indent(), self.name)?;
        let inner = ctx.deepen();
        for (i, value) in self.values.iter().enumerate() {
            value
                .encode(&inner, dst)
                .map_err(EncodeErrorKind::element("value", i, &self.name))?;
        }
        write!(dst, "\n{}}}", ctx.indent())?;
        Ok(())
    }
}

impl Encode for EnumValue {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        write!(dst, "\n{}{} = {};", ctx.indent(), self.name, self.number)?;
        if let Some(comment) = &self.comment {
            write!(dst, " // {}", comment.replace('\n', " "))?;
        }
        Ok(())
    }
}

impl Encode for Extend {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        write!(dst, "\n{}extend {} {{", ctx.indent(), self.extendee)?;
        let inner = ctx.deepen();
        for (i, field) in self.fields.iter().enumerate() {
            field
                .encode(&inner, dst)
                .map_err(EncodeErrorKind::element("field", i, &self.extendee))?;
        }
        write!(dst, "\n{}}}", ctx.indent())?;
        Ok(())
    }
}

impl Encode for Message {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        write!(dst, "\n{}message {} {{", ctx.indent(), self.name)?;
        let inner = ctx.deepen();

        // Children are written in a fixed order independent of population
        // order, so forward declarations always precede their uses.
        for (i, oneof) in self.oneofs.iter().enumerate() {
            oneof
                .encode(&inner, dst)
                .map_err(EncodeErrorKind::element("oneof", i, &self.name))?;
        }
        for (i, extend) in self.extends.iter().enumerate() {
            extend
                .encode(&inner, dst)
                .map_err(EncodeErrorKind::element("extend", i, &self.name))?;
        }
        for (i, option) in self.options.iter().enumerate() {
            option
                .encode(&inner, dst)
                .map_err(EncodeErrorKind::element("option", i, &self.name))?;
        }
        for (i, enum_) in self.enums.iter().enumerate() {
            enum_
                .encode(&inner, dst)
                .map_err(EncodeErrorKind::element("enum", i, &self.name))?;
        }
        for (i, message) in self.messages.iter().enumerate() {
            message
                .encode(&inner, dst)
                .map_err(EncodeErrorKind::element("message", i, &self.name))?;
        }
        for (i, field) in self.fields.iter().enumerate() {
            field
                .encode(&inner, dst)
                .map_err(EncodeErrorKind::element("field", i, &self.name))?;
        }

        write!(dst, "\n{}}}", ctx.indent())?;
        Ok(())
    }
}

impl Encode for Field {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        write!(dst, "\n{}", ctx.indent())?;
        match self.label {
            Some(FieldLabel::Required) => write!(dst, "required ")?,
            Some(FieldLabel::Optional) => write!(dst, "optional ")?,
            Some(FieldLabel::Repeated) => write!(dst, "repeated ")?,
            None => {}
        }
        write!(dst, "{} {} = {}", self.ty, self.name, self.number)?;

        if !self.options.is_empty() {
            write!(dst, " [")?;
            for (i, option) in self.options.iter().enumerate() {
                if i > 0 {
                    write!(dst, ", ")?;
                }
                option
                    .encode(ctx, dst)
                    .map_err(EncodeErrorKind::element("option", i, &self.name))?;
            }
            write!(dst, "]")?;
        }
        write!(dst, ";")?;
        Ok(())
    }
}

impl Encode for Service {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        write!(dst, "\n{}service {} {{", ctx.indent(), self.name)?;
        let inner = ctx.deepen();
        for (i, method) in self.methods.iter().enumerate() {
            method
                .encode(&inner, dst)
                .map_err(EncodeErrorKind::element("method", i, &self.name))?;
        }
        write!(dst, "\n{}}}", ctx.indent())?;
        Ok(())
    }
}

impl Encode for Method {
    fn encode(&self, ctx: &Context, dst: &mut dyn Write) -> Result<(), EncodeErrorKind> {
        write!(
            dst,
            "\n{}rpc {}({}) returns ({})",
            ctx.indent(),
            self.name,
            self.input,
            self.output
        )?;
        if !self.options.is_empty() {
            write!(dst, " {{")?;
            let inner = ctx.deepen();
            for (i, option) in self.options.iter().enumerate() {
                option
                    .encode(&inner, dst)
                    .map_err(EncodeErrorKind::element("option", i, &self.name))?;
            }
            write!(dst, "\n{}}}", ctx.indent())?;
        }
        write!(dst, ";")?;
        Ok(())
    }
}
