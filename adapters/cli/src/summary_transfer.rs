use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use pizza_brawl_core::RoundSummary;

const EXPORT_DOMAIN: &str = "brawl";
const EXPORT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded summary payload.
pub(crate) const EXPORT_HEADER: &str = "brawl:v1";
/// Delimiter used to separate the prefix, version and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes the summary into a single-line string suitable for clipboard transfer.
pub(crate) fn encode(summary: &RoundSummary) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(summary)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!("{EXPORT_HEADER}{FIELD_DELIMITER}{encoded}"))
}

/// Decodes a summary from the provided string representation.
pub(crate) fn decode(value: &str) -> Result<RoundSummary, SummaryTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SummaryTransferError::EmptyPayload);
    }

    let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
    let domain = parts.next().ok_or(SummaryTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(SummaryTransferError::MissingVersion)?;
    let payload = parts.next().ok_or(SummaryTransferError::MissingPayload)?;

    if domain != EXPORT_DOMAIN {
        return Err(SummaryTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != EXPORT_VERSION {
        return Err(SummaryTransferError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(SummaryTransferError::InvalidEncoding)?;
    serde_json::from_slice(&bytes).map_err(SummaryTransferError::InvalidPayload)
}

/// Errors that can occur while decoding summary transfer strings.
#[derive(Debug)]
pub(crate) enum SummaryTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded summary.
    MissingPrefix,
    /// The encoded summary did not contain a version segment.
    MissingVersion,
    /// The encoded summary did not include the payload segment.
    MissingPayload,
    /// The encoded summary used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded summary used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for SummaryTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "summary payload was empty"),
            Self::MissingPrefix => write!(f, "summary string is missing the prefix"),
            Self::MissingVersion => write!(f, "summary string is missing the version"),
            Self::MissingPayload => write!(f, "summary string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "summary prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "summary version '{version}' is not supported")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode summary payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse summary payload: {error}")
            }
        }
    }
}

impl Error for SummaryTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizza_brawl_core::{ActionCode, MoveLog, MoveLogEntry};

    #[test]
    fn round_trip_populated_summary() {
        let mut move_log = MoveLog::new();
        move_log.record(MoveLogEntry {
            column: 10,
            row: 13,
            action: ActionCode::Collect,
            timestamp_ms: 1_250,
        });
        move_log.record(MoveLogEntry {
            column: 3,
            row: 4,
            action: ActionCode::Deliver,
            timestamp_ms: 9_800,
        });
        let summary = RoundSummary {
            player_score: 100,
            player_deliveries: 1,
            bot_score: 350,
            bot_deliveries: 2,
            move_log,
        };

        let encoded = encode(&summary).expect("summary encodes");
        assert!(encoded.starts_with(&format!("{EXPORT_HEADER}:")));
        assert!(!encoded.contains('\n'));

        let decoded = decode(&encoded).expect("summary decodes");
        assert_eq!(summary, decoded);
    }

    #[test]
    fn rejects_foreign_prefix() {
        let error = decode("slice:v1:e30").expect_err("foreign prefix");
        assert!(matches!(error, SummaryTransferError::InvalidPrefix(prefix) if prefix == "slice"));
    }

    #[test]
    fn rejects_unknown_version() {
        let error = decode("brawl:v9:e30").expect_err("unknown version");
        assert!(matches!(error, SummaryTransferError::UnsupportedVersion(_)));
    }

    #[test]
    fn rejects_missing_payload_and_garbage() {
        assert!(matches!(
            decode("   "),
            Err(SummaryTransferError::EmptyPayload)
        ));
        assert!(matches!(
            decode("brawl:v1"),
            Err(SummaryTransferError::MissingPayload)
        ));
        assert!(matches!(
            decode("brawl:v1:!!!"),
            Err(SummaryTransferError::InvalidEncoding(_))
        ));
        let not_a_summary = STANDARD_NO_PAD.encode(b"[1,2,3]");
        assert!(matches!(
            decode(&format!("brawl:v1:{not_a_summary}")),
            Err(SummaryTransferError::InvalidPayload(_))
        ));
    }
}
