//! Compact button payloads for the two-step conversion flow.
//!
//! Wire shapes, slash-delimited:
//!
//! - `cnvtr/<src>/<id>/<dst>` and `cnval/<src>/<id>/<dst>` convert a track or
//!   album from one platform to another,
//! - `regtr/<id>/<sf>` and `regal/<id>/<sf>` show an Apple Music track or album
//!   in a specific storefront.
//!
//! A token carries all the state of a pending conversion; nothing is kept on
//! the server between the picker message and the button press.

use std::str::FromStr;

use thiserror::Error;

use super::entity::{EntityType, Platform, Storefront};

/// Upper bound the chat transport puts on callback data.
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

const DELIMITER: char = '/';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionToken {
    Convert {
        kind: EntityType,
        source: Platform,
        identifier: String,
        target: Platform,
    },
    SelectRegion {
        kind: EntityType,
        identifier: String,
        storefront: Storefront,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("unknown platform code `{0}`")]
    UnknownPlatform(String),
    #[error("source and target are both {0}")]
    SamePlatform(Platform),
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),
    #[error("invalid storefront `{0}`")]
    InvalidStorefront(String),
    #[error("callback data is {0} bytes, limit is 64")]
    TooLong(usize),
}

fn action_prefix(convert: bool, kind: EntityType) -> &'static str {
    match (convert, kind) {
        (true, EntityType::Track) => "cnvtr",
        (true, EntityType::Album) => "cnval",
        (false, EntityType::Track) => "regtr",
        (false, EntityType::Album) => "regal",
    }
}

fn parse_action(prefix: &str) -> Option<(bool, EntityType)> {
    match prefix {
        "cnvtr" => Some((true, EntityType::Track)),
        "cnval" => Some((true, EntityType::Album)),
        "regtr" => Some((false, EntityType::Track)),
        "regal" => Some((false, EntityType::Album)),
        _ => None,
    }
}

fn check_identifier(identifier: &str) -> Result<(), CallbackError> {
    if identifier.is_empty()
        || identifier.contains(DELIMITER)
        || identifier.chars().any(char::is_whitespace)
    {
        return Err(CallbackError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(())
}

fn parse_platform(code: &str) -> Result<Platform, CallbackError> {
    Platform::from_code(code).ok_or_else(|| CallbackError::UnknownPlatform(code.to_string()))
}

impl ConversionToken {
    pub fn kind(&self) -> EntityType {
        match self {
            ConversionToken::Convert { kind, .. } | ConversionToken::SelectRegion { kind, .. } => {
                *kind
            }
        }
    }

    /// Serializes the token, refusing anything the transport would truncate.
    pub fn encode(&self) -> Result<String, CallbackError> {
        let data = match self {
            ConversionToken::Convert {
                kind,
                source,
                identifier,
                target,
            } => {
                check_identifier(identifier)?;
                if source == target {
                    return Err(CallbackError::SamePlatform(*source));
                }
                format!(
                    "{}/{}/{}/{}",
                    action_prefix(true, *kind),
                    source.code(),
                    identifier,
                    target.code()
                )
            }
            ConversionToken::SelectRegion {
                kind,
                identifier,
                storefront,
            } => {
                check_identifier(identifier)?;
                format!("{}/{}/{}", action_prefix(false, *kind), identifier, storefront)
            }
        };

        if data.len() > MAX_CALLBACK_DATA_LEN {
            return Err(CallbackError::TooLong(data.len()));
        }
        Ok(data)
    }

    pub fn decode(data: &str) -> Result<Self, CallbackError> {
        if data.len() > MAX_CALLBACK_DATA_LEN {
            return Err(CallbackError::TooLong(data.len()));
        }

        let fields: Vec<&str> = data.split(DELIMITER).collect();
        let (convert, kind) =
            parse_action(fields[0]).ok_or_else(|| CallbackError::UnknownAction(fields[0].to_string()))?;

        if convert {
            let [_, source, identifier, target] = fields[..] else {
                return Err(CallbackError::FieldCount {
                    expected: 4,
                    found: fields.len(),
                });
            };
            let source = parse_platform(source)?;
            let target = parse_platform(target)?;
            check_identifier(identifier)?;
            if source == target {
                return Err(CallbackError::SamePlatform(source));
            }

            Ok(ConversionToken::Convert {
                kind,
                source,
                identifier: identifier.to_string(),
                target,
            })
        } else {
            let [_, identifier, storefront] = fields[..] else {
                return Err(CallbackError::FieldCount {
                    expected: 3,
                    found: fields.len(),
                });
            };
            check_identifier(identifier)?;
            let storefront = Storefront::parse(storefront)
                .ok_or_else(|| CallbackError::InvalidStorefront(storefront.to_string()))?;

            Ok(ConversionToken::SelectRegion {
                kind,
                identifier: identifier.to_string(),
                storefront,
            })
        }
    }
}

impl FromStr for ConversionToken {
    type Err = CallbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
