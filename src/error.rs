use std::{error::Error as _, fmt, io};

use miette::Diagnostic;
use thiserror::Error;

/// An error that may occur while encoding a protobuf file.
#[derive(Diagnostic, Error)]
#[error(transparent)]
#[diagnostic(transparent)]
pub struct EncodeError {
    kind: Box<EncodeErrorKind>,
}

#[derive(Debug, Diagnostic, Error)]
pub(crate) enum EncodeErrorKind {
    #[error("failed to encode {kind} {index} of '{parent}'")]
    Element {
        kind: &'static str,
        index: usize,
        parent: String,
        #[source]
        err: Box<EncodeErrorKind>,
    },
    #[error("error writing output")]
    Io {
        #[from]
        err: io::Error,
    },
}

impl EncodeErrorKind {
    /// Wraps a child failure with the position of the element that produced it.
    pub(crate) fn element<'a>(
        kind: &'static str,
        index: usize,
        parent: &'a str,
    ) -> impl FnOnce(EncodeErrorKind) -> EncodeErrorKind + 'a {
        move |err| EncodeErrorKind::Element {
            kind,
            index,
            parent: parent.to_owned(),
            err: Box::new(err),
        }
    }
}

impl EncodeError {
    pub(crate) fn from_kind(kind: EncodeErrorKind) -> Self {
        EncodeError {
            kind: Box::new(kind),
        }
    }

    /// The kind of declaration that failed to encode, if the failure occurred
    /// within a declaration.
    pub fn kind(&self) -> Option<&'static str> {
        match &*self.kind {
            EncodeErrorKind::Element { kind, .. } => Some(kind),
            EncodeErrorKind::Io { .. } => None,
        }
    }

    /// The name of the declaration enclosing the failed element, if available.
    pub fn parent(&self) -> Option<&str> {
        match &*self.kind {
            EncodeErrorKind::Element { parent, .. } => Some(parent),
            EncodeErrorKind::Io { .. } => None,
        }
    }

    /// Returns true if this error was caused by a failed write to the output
    /// sink.
    pub fn is_io(&self) -> bool {
        let mut kind = &*self.kind;
        loop {
            match kind {
                EncodeErrorKind::Element { err, .. } => kind = err,
                EncodeErrorKind::Io { .. } => return true,
            }
        }
    }
}

impl fmt::Debug for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)?;
        let mut source = self.kind.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

#[test]
fn fmt_debug_io() {
    let err = EncodeError::from_kind(EncodeErrorKind::Element {
        kind: "field",
        index: 1,
        parent: "Foo".to_owned(),
        err: Box::new(EncodeErrorKind::Io {
            err: io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"),
        }),
    });

    assert!(err.is_io());
    assert_eq!(err.kind(), Some("field"));
    assert_eq!(err.parent(), Some("Foo"));
    assert_eq!(
        format!("{:?}", err),
        "failed to encode field 1 of 'Foo': error writing output: pipe closed"
    );
}

#[test]
fn fmt_display_top_level() {
    let err = EncodeError::from_kind(EncodeErrorKind::Element {
        kind: "message",
        index: 0,
        parent: "foo.bar".to_owned(),
        err: Box::new(EncodeErrorKind::Io {
            err: io::Error::new(io::ErrorKind::Other, "sink full"),
        }),
    });

    assert_eq!(format!("{}", err), "failed to encode message 0 of 'foo.bar'");
}
