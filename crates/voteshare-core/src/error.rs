/// Shared HTTP-facing error taxonomy (spec §7). Each crate with its own
/// failure modes (`CastError`, `TallyError`, `ShareError`, ...) defines a
/// local `thiserror::Error` enum and maps it onto one of these kinds so
/// the coordinator and the share nodes never drift in their status-code
/// mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Precondition,
    AuthFailure,
    Gateway,
    Internal,
    BadRequest,
}

impl ErrorKind {
    /// HTTP status per spec §7.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Precondition => 409,
            ErrorKind::AuthFailure => 401,
            ErrorKind::Gateway => 502,
            ErrorKind::Internal => 500,
            ErrorKind::BadRequest => 400,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Precondition => "precondition_failed",
            ErrorKind::AuthFailure => "auth_failure",
            ErrorKind::Gateway => "gateway_error",
            ErrorKind::Internal => "internal_error",
            ErrorKind::BadRequest => "bad_request",
        }
    }
}
