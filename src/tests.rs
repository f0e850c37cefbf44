use std::io;
use std::sync::{RwLock, RwLockReadGuard};

use once_cell::sync::Lazy;
use proptest::prelude::*;
use scopeguard::defer;
use similar_asserts::assert_eq;

use crate::ast::{EnumValue, Field, FieldLabel, ImportKind, Method};
use crate::builder::{
    EnumBuilder, ExtendBuilder, FileBuilder, MessageBuilder, MessageLiteralBuilder, OneofBuilder,
    ServiceBuilder,
};
use crate::{set_indent, to_string, to_vec, to_writer};

// The indentation unit is process-wide state shared by every test. Tests that
// encode with the default unit hold a read guard; tests that reconfigure it
// hold the write guard.
static INDENT_CONFIG: Lazy<RwLock<()>> = Lazy::new(|| RwLock::new(()));

fn indent_guard() -> RwLockReadGuard<'static, ()> {
    INDENT_CONFIG
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[test]
fn package_only() {
    let _guard = indent_guard();

    let file = FileBuilder::new().package("foo").build();

    assert_eq!(
        to_string(&file).unwrap(),
        "syntax = \"proto3\";\n\npackage foo;"
    );
}

#[test]
fn import_kinds() {
    let _guard = indent_guard();

    let file = FileBuilder::new()
        .package("imports")
        .import("a.proto", None)
        .import("b.proto", Some(ImportKind::Public))
        .import("c.proto", Some(ImportKind::Weak))
        .build();

    assert_eq!(
        to_string(&file).unwrap(),
        r#"syntax = "proto3";

package imports;

import "a.proto";
import public "b.proto";
import weak "c.proto";"#
    );
}

#[test]
fn message_child_ordering() {
    let _guard = indent_guard();

    // Children are attached in the reverse of the encoded order; the output
    // order must not change.
    let file = FileBuilder::new()
        .package("ordering")
        .message(
            MessageBuilder::new("Scrambled")
                .field(Field::string("trailing", 5))
                .message(MessageBuilder::new("Inner").build())
                .enum_(EnumBuilder::new("Kind").value("UNKNOWN", 0).build())
                .option("deprecated", true)
                .extend(
                    ExtendBuilder::new("google.protobuf.FieldOptions")
                        .field(Field::uint64("tag", 1000))
                        .build(),
                )
                .oneof(
                    OneofBuilder::new("choice")
                        .field(Field::string("a", 1))
                        .build(),
                )
                .build(),
        )
        .build();

    assert_eq!(
        to_string(&file).unwrap(),
        r#"syntax = "proto3";

package ordering;

message Scrambled {
    oneof choice {
        string a = 1;
    }
    extend google.protobuf.FieldOptions {
        uint64 tag = 1000;
    }
    option deprecated = true;
    enum Kind {
        UNKNOWN = 0;
    }
    message Inner {
    }
    string trailing = 5;
}"#
    );
}

#[test]
fn field_labels() {
    let _guard = indent_guard();

    let file = FileBuilder::new()
        .package("labels")
        .message(
            MessageBuilder::new("Labelled")
                .field(Field::string("a", 1).label(FieldLabel::Required))
                .field(Field::uint64("b", 2).label(FieldLabel::Optional))
                .field(Field::string("c", 3).label(FieldLabel::Repeated))
                .field(Field::string("d", 4))
                .build(),
        )
        .build();

    assert_eq!(
        to_string(&file).unwrap(),
        r#"syntax = "proto3";

package labels;

message Labelled {
    required string a = 1;
    optional uint64 b = 2;
    repeated string c = 3;
    string d = 4;
}"#
    );
}

#[test]
fn compact_options_are_comma_separated() {
    let _guard = indent_guard();

    let file = FileBuilder::new()
        .package("options")
        .message(
            MessageBuilder::new("Annotated")
                .field(
                    Field::string("name", 1)
                        .option("deprecated", true)
                        .option("json_name", "\"name_alias\""),
                )
                .build(),
        )
        .build();

    assert_eq!(
        to_string(&file).unwrap(),
        r#"syntax = "proto3";

package options;

message Annotated {
    string name = 1 [deprecated = true, json_name = "name_alias"];
}"#
    );
}

#[test]
fn message_literal_multi_line() {
    let _guard = indent_guard();

    let file = FileBuilder::new()
        .package("literals")
        .option(
            "(layout)",
            MessageLiteralBuilder::new()
                .field("name", "\"x\"")
                .field("id", 1)
                .build(),
        )
        .build();

    assert_eq!(
        to_string(&file).unwrap(),
        r#"syntax = "proto3";

package literals;

option (layout) = {
    name: "x"
    id: 1
};"#
    );
}

#[test]
fn message_literal_single_line() {
    let _guard = indent_guard();

    let file = FileBuilder::new()
        .package("literals")
        .option(
            "(layout)",
            MessageLiteralBuilder::new()
                .single_line()
                .field("name", "\"x\"")
                .field("id", 1)
                .build(),
        )
        .build();

    assert_eq!(
        to_string(&file).unwrap(),
        r#"syntax = "proto3";

package literals;

option (layout) = {name: "x" id: 1};"#
    );
}

#[test]
fn method_options() {
    let _guard = indent_guard();

    let file = FileBuilder::new()
        .package("rpc")
        .service(
            ServiceBuilder::new("Search")
                .method(
                    Method::new("Lookup", "Request", "Response")
                        .option("deadline", 30)
                        .option("(idempotency)", "IDEMPOTENT"),
                )
                .rpc("Ping", "Empty", "Empty")
                .build(),
        )
        .build();

    assert_eq!(
        to_string(&file).unwrap(),
        r#"syntax = "proto3";

package rpc;

service Search {
    rpc Lookup(Request) returns (Response) {
        option deadline = 30;
        option (idempotency) = IDEMPOTENT;
    };
    rpc Ping(Empty) returns (Empty);
}"#
    );
}

#[test]
fn enum_comments() {
    let _guard = indent_guard();

    let mut unit = EnumBuilder::new("Unit")
        .comment("Units of measurement.\nKeep in sync with the backend.")
        .value("VOID", 0)
        .build();
    unit.values.push(EnumValue {
        name: "SOME".to_owned(),
        number: 1,
        comment: Some("one\ntwo".to_owned()),
    });

    let file = FileBuilder::new().package("comments").enum_(unit).build();

    assert_eq!(
        to_string(&file).unwrap(),
        r#"syntax = "proto3";

package comments;

// Units of measurement.
// Keep in sync with the backend.
enum Unit {
    VOID = 0;
    SOME = 1; // one two
}"#
    );
}

#[test]
fn sanity() {
    let _guard = indent_guard();

    let file = FileBuilder::new()
        .package("foo.bar")
        .import("google/protobuf/descriptor.proto", None)
        .enum_(EnumBuilder::new("Unit").value("VOID", 0).build())
        .message(
            MessageBuilder::new("Message")
                .oneof(
                    OneofBuilder::new("id")
                        .field(Field::string("name", 1))
                        .field(Field::uint64("num", 2))
                        .build(),
                )
                .message(
                    MessageBuilder::new("NestedMessage")
                        .extend(
                            ExtendBuilder::new("google.protobuf.MessageOptions")
                                .field(Field::string("fizz", 49999))
                                .build(),
                        )
                        .option("(NestedMessage.fizz)", "\"buzz\"")
                        .enum_(
                            EnumBuilder::new("Kind")
                                .value("NULL", 0)
                                .value("PRIMARY", 1)
                                .value("SECONDARY", 2)
                                .build(),
                        )
                        .field(Field::new("Kind", "kind", 1))
                        .build(),
                )
                .field(Field::new("NestedMessage", "extra", 3))
                .build(),
        )
        .service(
            ServiceBuilder::new("FooService")
                .rpc("Bar", "Message", "Message")
                .build(),
        )
        .build();

    assert_eq!(
        to_string(&file).unwrap(),
        r#"syntax = "proto3";

package foo.bar;

import "google/protobuf/descriptor.proto";

message Message {
    oneof id {
        string name = 1;
        uint64 num = 2;
    }
    message NestedMessage {
        extend google.protobuf.MessageOptions {
            string fizz = 49999;
        }
        option (NestedMessage.fizz) = "buzz";
        enum Kind {
            NULL = 0;
            PRIMARY = 1;
            SECONDARY = 2;
        }
        Kind kind = 1;
    }
    NestedMessage extra = 3;
}

enum Unit {
    VOID = 0;
}

service FooService {
    rpc Bar(Message) returns (Message);
}"#
    );
}

#[test]
fn nested_message_literal_option() {
    let _guard = indent_guard();

    let file = FileBuilder::new()
        .package("foo")
        .extend(
            ExtendBuilder::new("google.protobuf.MessageOptions")
                .field(Field::new("google.protobuf.Any", "extra", 33333))
                .build(),
        )
        .message(
            MessageBuilder::new("Foo")
                .field(Field::string("name", 1))
                .build(),
        )
        .message(
            MessageBuilder::new("Bar")
                .option(
                    "(extra)",
                    MessageLiteralBuilder::new()
                        .field(
                            "foo",
                            MessageLiteralBuilder::new()
                                .field("name", "\"foobar\"")
                                .field("id", 42)
                                .build(),
                        )
                        .build(),
                )
                .build(),
        )
        .build();

    assert_eq!(
        to_string(&file).unwrap(),
        r#"syntax = "proto3";

package foo;

extend google.protobuf.MessageOptions {
    google.protobuf.Any extra = 33333;
}

message Foo {
    string name = 1;
}

message Bar {
    option (extra) = {
        foo: {
            name: "foobar"
            id: 42
        }
    };
}"#
    );
}

#[test]
fn deterministic() {
    let _guard = indent_guard();

    let file = FileBuilder::new()
        .package("determinism")
        .import("other.proto", None)
        .message(
            MessageBuilder::new("Foo")
                .oneof(
                    OneofBuilder::new("id")
                        .field(Field::string("name", 1))
                        .build(),
                )
                .field(Field::uint64("num", 2))
                .build(),
        )
        .build();

    let first = to_vec(&file).unwrap();
    let second = to_vec(&file).unwrap();
    assert_eq!(first, second);
    assert_eq!(to_string(&file).unwrap().into_bytes(), first);
}

/// A sink with a fixed byte budget; any write that exceeds it fails.
struct FailingSink {
    remaining: usize,
}

impl io::Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() > self.remaining {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink full"))
        } else {
            self.remaining -= buf.len();
            Ok(buf.len())
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn sink_failure_names_grandchild() {
    let _guard = indent_guard();

    let file = FileBuilder::new()
        .package("pkg")
        .message(
            MessageBuilder::new("Foo")
                .field(Field::string("name", 1))
                .build(),
        )
        .build();

    // Exhaust the budget one byte into the field declaration, so the failing
    // write happens two levels below the file.
    let text = to_string(&file).unwrap();
    let budget = text.find("\n    string").unwrap() + 1;

    let err = to_writer(&file, &mut FailingSink { remaining: budget }).unwrap_err();

    assert!(err.is_io());
    assert_eq!(err.kind(), Some("message"));
    assert_eq!(err.parent(), Some("pkg"));
    assert_eq!(
        format!("{:?}", err),
        "failed to encode message 0 of 'pkg': failed to encode field 0 of 'Foo': error writing output: sink full"
    );
}

#[test]
fn indent_reconfiguration() {
    let _guard = INDENT_CONFIG
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    defer! {
        set_indent("    ");
    }

    let file = FileBuilder::new()
        .package("indent")
        .message(
            MessageBuilder::new("Foo")
                .field(Field::string("name", 1))
                .build(),
        )
        .build();

    set_indent("\t");
    assert_eq!(
        to_string(&file).unwrap(),
        "syntax = \"proto3\";\n\npackage indent;\n\nmessage Foo {\n\tstring name = 1;\n}"
    );

    set_indent("  ");
    assert_eq!(
        to_string(&file).unwrap(),
        "syntax = \"proto3\";\n\npackage indent;\n\nmessage Foo {\n  string name = 1;\n}"
    );
}

proptest! {
    #[test]
    fn enum_rendering(
        name in "[A-Z][A-Za-z0-9]{0,8}",
        values in prop::collection::vec(("[A-Z][A-Z0-9_]{0,8}", 0i32..1000), 1..8),
    ) {
        let _guard = indent_guard();

        let mut builder = EnumBuilder::new(name.clone());
        for (value_name, number) in &values {
            builder = builder.value(value_name.clone(), *number);
        }
        let file = FileBuilder::new()
            .package("props")
            .enum_(builder.build())
            .build();

        let first = to_vec(&file).unwrap();
        let second = to_vec(&file).unwrap();
        prop_assert_eq!(&first, &second);

        let text = String::from_utf8(first).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        prop_assert_eq!(lines[4], format!("enum {} {{", name));
        for (i, (value_name, number)) in values.iter().enumerate() {
            prop_assert_eq!(lines[5 + i], format!("    {} = {};", value_name, number));
        }
        prop_assert_eq!(*lines.last().unwrap(), "}");
    }
}
