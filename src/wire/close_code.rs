use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Reason reported for close codes outside the known table.
pub const UNKNOWN_CLOSE_REASON: &str = "Unknown reason.";

/// WebSocket close codes (RFC 6455, section 7.4.1).
#[repr(u16)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, TryFromPrimitive, IntoPrimitive)]
pub enum CloseCode {
    Normal = 1000,
    Away = 1001,
    Protocol = 1002,
    Unsupported = 1003,
    Reserved = 1004,
    NoStatus = 1005,
    Abnormal = 1006,
    InvalidPayload = 1007,
    Policy = 1008,
    TooLarge = 1009,
    MissingExtension = 1010,
    InternalError = 1011,
    TlsHandshake = 1015,
}

impl CloseCode {
    #[inline]
    pub fn value(self) -> u16 {
        self.into()
    }

    #[inline]
    pub fn is_normal(self) -> bool {
        self == CloseCode::Normal
    }

    /// User-facing explanation of why the stream ended.
    pub fn reason(self) -> &'static str {
        match self {
            CloseCode::Normal => "Normal closure.",
            CloseCode::Away => "Endpoint disconnected.",
            CloseCode::Protocol => "Protocol error.",
            CloseCode::Unsupported => "Incorrect data.",
            CloseCode::Reserved => "Reserved.",
            CloseCode::NoStatus => "No status code.",
            CloseCode::Abnormal => "Connection closed abnormally.",
            CloseCode::InvalidPayload => "Incorrect message type.",
            CloseCode::Policy => "Message violates policy.",
            CloseCode::TooLarge => "Message too large.",
            CloseCode::MissingExtension => "Protocol extension not supported.",
            CloseCode::InternalError => "Unexpected server condition.",
            CloseCode::TlsHandshake => "Cannot verify server TLS certificate.",
        }
    }
}

/// Maps a raw close code to its reason, falling back to
/// [`UNKNOWN_CLOSE_REASON`].
pub fn close_reason(code: u16) -> &'static str {
    CloseCode::try_from(code)
        .map(CloseCode::reason)
        .unwrap_or(UNKNOWN_CLOSE_REASON)
}
