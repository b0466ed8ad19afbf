use std::{error, fmt, io};

use crate::config::ConfigError;

#[derive(Debug)]
pub enum Error {
    InvalidConfiguration(ConfigError),
    Unsupported(&'static str),
    UnexpectedResponse,
    HttpError(Box<dyn error::Error + Send>),
    JsonError(Box<dyn error::Error + Send>),
    UrlError(url::ParseError),
    IoError(io::Error),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(err) => err.fmt(f),
            Self::Unsupported(what) => write!(f, "Not supported: {what}"),
            Self::UnexpectedResponse => write!(f, "Unknown server response"),
            Self::HttpError(err) | Self::JsonError(err) => err.fmt(f),
            Self::UrlError(err) => err.fmt(f),
            Self::IoError(err) => err.fmt(f),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Error {
        Error::InvalidConfiguration(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::JsonError(Box::new(err))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::UrlError(err)
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Error {
        Error::HttpError(Box::new(err))
    }
}
