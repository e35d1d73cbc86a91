//! Pure classification of poll responses and transport failures.

use std::error::Error as StdError;
use std::io;

use cse_status_protocol::{MarketStatusResponse, NetworkReason, Outcome, ParseFailure};

/// Classifies an HTTP response by status code and body.
pub fn classify_response(status: u16, body: &[u8]) -> Outcome {
    if !(200..300).contains(&status) {
        return Outcome::ServerError(status);
    }

    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(_) => return Outcome::ParseError(ParseFailure::Malformed),
    };

    // Derived structs also accept sequences; only an object carries `status`.
    if !value.is_object() {
        return Outcome::ParseError(ParseFailure::MissingStatus);
    }

    match serde_json::from_value::<MarketStatusResponse>(value) {
        Ok(resp) => classify_status_text(&resp.status),
        Err(_) => Outcome::ParseError(ParseFailure::MissingStatus),
    }
}

/// Maps the endpoint's status string onto open / closed / unknown.
///
/// Case-insensitive substring match, `"open"` checked first: `"Pre-Open"`
/// counts as open.
pub fn classify_status_text(text: &str) -> Outcome {
    let lower = text.to_lowercase();
    if lower.contains("open") {
        Outcome::Open(text.to_string())
    } else if lower.contains("closed") {
        Outcome::Closed(text.to_string())
    } else {
        Outcome::Unknown(text.to_string())
    }
}

/// Maps a `reqwest` transport error onto a [`NetworkReason`].
pub fn network_reason(err: &reqwest::Error) -> NetworkReason {
    classify_transport(err, err.is_timeout(), err.is_connect(), reqwest_code(err))
}

/// Total mapping from a transport error chain to a [`NetworkReason`].
///
/// `timed_out` and `connect_phase` come from the HTTP client's own flags;
/// `fallback_code` names the failure when no OS error code is available.
pub fn classify_transport(
    err: &(dyn StdError + 'static),
    timed_out: bool,
    connect_phase: bool,
    fallback_code: &str,
) -> NetworkReason {
    if timed_out {
        return NetworkReason::Timeout;
    }

    let io_err = find_io_error(err);
    if let Some(io_err) = io_err {
        match io_err.kind() {
            io::ErrorKind::TimedOut => return NetworkReason::Timeout,
            io::ErrorKind::NetworkUnreachable | io::ErrorKind::NetworkDown => {
                return NetworkReason::NoConnectivity;
            }
            io::ErrorKind::HostUnreachable
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::AddrNotAvailable => return NetworkReason::HostUnreachable,
            _ => {}
        }
    }

    // DNS failures surface as untyped connect errors.
    if connect_phase {
        return NetworkReason::HostUnreachable;
    }

    match io_err.and_then(io::Error::raw_os_error) {
        Some(code) => NetworkReason::Other(format!("os-{code}")),
        None => NetworkReason::Other(fallback_code.to_string()),
    }
}

/// Returns the first `io::Error` in the source chain, if any.
fn find_io_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a io::Error> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            return Some(io_err);
        }
        current = e.source();
    }
    None
}

fn reqwest_code(err: &reqwest::Error) -> &'static str {
    if err.is_builder() {
        "builder"
    } else if err.is_redirect() {
        "redirect"
    } else if err.is_body() {
        "body"
    } else if err.is_decode() {
        "decode"
    } else if err.is_request() {
        "request"
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;

    /// Wraps an error the way HTTP clients nest transport failures.
    #[derive(Debug)]
    struct Wrapped(io::Error);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "client error")
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    fn wrapped(kind: io::ErrorKind) -> Wrapped {
        Wrapped(io::Error::from(kind))
    }

    #[test]
    fn open_closed_unknown_substring_match() {
        assert_eq!(classify_status_text("OPEN"), Outcome::Open("OPEN".into()));
        assert_eq!(
            classify_status_text("Pre-Open"),
            Outcome::Open("Pre-Open".into())
        );
        assert_eq!(
            classify_status_text("Market is Open"),
            Outcome::Open("Market is Open".into())
        );
        assert_eq!(
            classify_status_text("Closed for Holiday"),
            Outcome::Closed("Closed for Holiday".into())
        );
        assert_eq!(
            classify_status_text("MARKET CLOSED"),
            Outcome::Closed("MARKET CLOSED".into())
        );
        assert_eq!(
            classify_status_text("Trading Halted"),
            Outcome::Unknown("Trading Halted".into())
        );
        assert_eq!(classify_status_text(""), Outcome::Unknown(String::new()));
    }

    #[test]
    fn open_wins_when_both_words_present() {
        assert_eq!(
            classify_status_text("Closed, opens at 9:30"),
            Outcome::Open("Closed, opens at 9:30".into())
        );
    }

    #[test]
    fn success_body_with_status() {
        let outcome = classify_response(200, br#"{"status":"Market Closed","code":0}"#);
        assert_eq!(outcome, Outcome::Closed("Market Closed".into()));

        let outcome = classify_response(204, br#"{"status":"Regular Trading Open"}"#);
        assert_eq!(outcome, Outcome::Open("Regular Trading Open".into()));
    }

    #[test]
    fn success_body_missing_or_non_string_status() {
        for body in [
            &br#"{"state":"open"}"#[..],
            br#"{"status":1}"#,
            br#"{"status":null}"#,
            br#"["open"]"#,
            br#""open""#,
        ] {
            assert_eq!(
                classify_response(200, body),
                Outcome::ParseError(ParseFailure::MissingStatus),
                "body {}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn success_body_decodes_into_response_type() {
        let outcome = classify_response(
            200,
            br#"{"status":"Trading Halted","marketId":3,"extra":{"nested":true}}"#,
        );
        assert_eq!(outcome, Outcome::Unknown("Trading Halted".into()));

        // Positional form of the response struct is not a valid body.
        assert_eq!(
            classify_response(200, br#"["Market is Open"]"#),
            Outcome::ParseError(ParseFailure::MissingStatus)
        );
    }

    #[test]
    fn success_body_unparsable() {
        for body in [&b""[..], b"<html>oops</html>", br#"{"status":"#] {
            assert_eq!(
                classify_response(299, body),
                Outcome::ParseError(ParseFailure::Malformed)
            );
        }
    }

    #[test]
    fn non_success_preserves_code() {
        for code in [100u16, 199, 300, 301, 404, 500, 503, 599] {
            assert_eq!(
                classify_response(code, br#"{"status":"open"}"#),
                Outcome::ServerError(code)
            );
        }
    }

    #[test]
    fn timeout_flag_wins() {
        let err = wrapped(io::ErrorKind::ConnectionRefused);
        assert_eq!(
            classify_transport(&err, true, true, "request"),
            NetworkReason::Timeout
        );
    }

    #[test]
    fn io_kinds_map_to_reasons() {
        let cases = [
            (io::ErrorKind::TimedOut, NetworkReason::Timeout),
            (io::ErrorKind::NetworkUnreachable, NetworkReason::NoConnectivity),
            (io::ErrorKind::NetworkDown, NetworkReason::NoConnectivity),
            (io::ErrorKind::HostUnreachable, NetworkReason::HostUnreachable),
            (io::ErrorKind::ConnectionRefused, NetworkReason::HostUnreachable),
            (io::ErrorKind::AddrNotAvailable, NetworkReason::HostUnreachable),
        ];
        for (kind, expected) in cases {
            let err = wrapped(kind);
            assert_eq!(
                classify_transport(&err, false, false, "request"),
                expected,
                "{kind:?}"
            );
        }
    }

    #[test]
    fn unrecognized_connect_failure_is_host_unreachable() {
        let err = Wrapped(io::Error::other("dns error: failed to lookup address"));
        assert_eq!(
            classify_transport(&err, false, true, "request"),
            NetworkReason::HostUnreachable
        );
    }

    #[test]
    fn unrecognized_errors_fall_into_other() {
        let err = Wrapped(io::Error::from_raw_os_error(54));
        assert_eq!(
            classify_transport(&err, false, false, "body"),
            NetworkReason::Other("os-54".into())
        );

        let err = wrapped(io::ErrorKind::UnexpectedEof);
        assert_eq!(
            classify_transport(&err, false, false, "body"),
            NetworkReason::Other("body".into())
        );
    }

    #[test]
    fn chain_without_io_error_uses_fallback() {
        let err = io::Error::other("plain");
        let boxed: Box<dyn StdError + 'static> = Box::new(fmt::Error);
        assert_eq!(
            classify_transport(boxed.as_ref(), false, false, "redirect"),
            NetworkReason::Other("redirect".into())
        );
        // A bare io::Error is found at the head of the chain.
        assert_eq!(
            classify_transport(&err, false, false, "request"),
            NetworkReason::Other("request".into())
        );
    }
}
