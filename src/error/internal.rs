use std::error;
use std::fmt;

use backtrace::Backtrace;

#[derive(Debug)]
pub(crate) struct Error {
    kind: ErrorKind,
    backtrace: Option<Backtrace>,
}

#[derive(Debug)]
pub(crate) enum ErrorKind {
    // A persisted blob did not deserialize into its expected shape.
    BlobDecode { description: String },
    ConfigDecode { description: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            ErrorKind::BlobDecode { description, .. } => {
                write!(f, "blob decode error. {}", description)
            }
            ErrorKind::ConfigDecode { description, .. } => {
                write!(f, "config decode error. {}", description)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::from(ErrorKind::BlobDecode {
            description: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::from(ErrorKind::ConfigDecode {
            description: err.to_string(),
        })
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::with_backtrace(kind)
    }
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    fn with_backtrace(kind: ErrorKind) -> Self {
        Self {
            kind,
            backtrace: Some(Backtrace::new()),
        }
    }
}

impl error::Error for Error {}
