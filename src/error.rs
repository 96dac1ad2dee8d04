use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

/// Broad category of a failure, stable enough to match on.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Kind {
    /// The request could not be sent, timed out, or its body could not be read.
    Network,
    /// The exchange delivered a response carrying an error envelope.
    Remote,
    /// The response did not have the shape expected for the endpoint.
    Decoding,
    /// Input was rejected on the client before anything was sent.
    Validation,
    /// Anything else, e.g. failing to serialize a request body.
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    #[must_use]
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn validation<S: Into<String>>(reason: S) -> Self {
        Validation {
            reason: reason.into(),
        }
        .into()
    }

    pub fn decoding<S: Into<String>>(reason: S) -> Self {
        Decoding {
            reason: reason.into(),
        }
        .into()
    }

    pub fn remote<S: Into<String>>(message: S, code: Option<i64>) -> Self {
        Remote {
            message: message.into(),
            code,
        }
        .into()
    }

    /// Message reported by the exchange, if this is a [`Kind::Remote`] error.
    #[must_use]
    pub fn remote_message(&self) -> Option<&str> {
        self.downcast_ref::<Remote>().map(|r| r.message.as_str())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{}: {}", self.kind, src),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Error envelope the exchange embedded in an otherwise delivered response.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub message: String,
    pub code: Option<i64>,
}

impl fmt::Display for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exchange error {code}: {}", self.message),
            None => write!(f, "exchange error: {}", self.message),
        }
    }
}

impl StdError for Remote {}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoding {
    pub reason: String,
}

impl fmt::Display for Decoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected response: {}", self.reason)
    }
}

impl StdError for Decoding {}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

impl From<Remote> for Error {
    fn from(e: Remote) -> Self {
        Error::with_source(Kind::Remote, e)
    }
}

impl From<Decoding> for Error {
    fn from(e: Decoding) -> Self {
        Error::with_source(Kind::Decoding, e)
    }
}

impl From<Validation> for Error {
    fn from(e: Validation) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Error::with_source(Kind::Internal, e)
        } else {
            Error::with_source(Kind::Network, e)
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Decoding, e)
    }
}
