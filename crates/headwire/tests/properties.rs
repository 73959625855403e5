//! Property tests over the public parsing API.

use headwire::{Header, Method, ParseStatus, RequestHead, ResponseHead, Version};
use proptest::prelude::*;

fn arbitrary_method() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::Get),
        Just(Method::Post),
        Just(Method::Head),
        Just(Method::Put),
        Just(Method::Delete),
        Just(Method::Connect),
        Just(Method::Options),
        Just(Method::Trace),
        Just(Method::Patch),
    ]
}

fn arbitrary_version() -> impl Strategy<Value = Version> {
    prop_oneof![Just(Version::Http10), Just(Version::Http11)]
}

/// Header lines whose names and values stay inside the accepted classes.
/// Values may carry interior spaces; leading spaces are separator bytes and
/// are generated separately.
fn arbitrary_headers() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec(
        (
            "[A-Za-z][A-Za-z0-9-]{0,14}",
            "[a-zA-Z0-9 ,;=/.-]{0,24}".prop_map(|v| v.trim_start_matches(' ').to_string()),
        ),
        0..6,
    )
}

fn render_request(
    method: Method,
    path: &str,
    version: Version,
    headers: &[(String, String)],
) -> String {
    let mut message = format!("{method} /{path} {version}\r\n");
    for (name, value) in headers {
        message.push_str(&format!("{name}: {value}\r\n"));
    }
    message.push_str("\r\n");
    message
}

proptest! {
    #[test]
    fn request_parse_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut headers = [Header::EMPTY; 8];
        let mut head = RequestHead::new(&mut headers);
        let _ = head.parse(&bytes);
    }

    #[test]
    fn response_parse_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut headers = [Header::EMPTY; 8];
        let mut head = ResponseHead::new(&mut headers);
        let _ = head.parse(&bytes);
    }

    #[test]
    fn well_formed_requests_round_trip(
        method in arbitrary_method(),
        path in "[a-zA-Z0-9/_.~-]{0,40}",
        version in arbitrary_version(),
        header_lines in arbitrary_headers(),
    ) {
        let message = render_request(method, &path, version, &header_lines);
        let buf = message.as_bytes();

        let mut headers = [Header::EMPTY; 8];
        let mut head = RequestHead::new(&mut headers);
        let status = head.parse(buf).expect("generated request is well-formed");

        prop_assert_eq!(status, ParseStatus::Complete(buf.len()));
        prop_assert_eq!(head.method, Some(method));
        prop_assert_eq!(head.path.map(|p| p.to_vec()), Some(format!("/{path}").into_bytes()));
        prop_assert_eq!(head.version, Some(version));
        prop_assert_eq!(head.headers().len(), header_lines.len());
        for (parsed, (name, value)) in head.headers().iter().zip(&header_lines) {
            prop_assert_eq!(parsed.name(), name.as_bytes());
            prop_assert_eq!(parsed.value(), value.as_bytes());
        }
    }

    #[test]
    fn completion_is_stable_under_extension(
        method in arbitrary_method(),
        path in "[a-zA-Z0-9/_.~-]{0,40}",
        version in arbitrary_version(),
        header_lines in arbitrary_headers(),
        suffix in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let message = render_request(method, &path, version, &header_lines);
        let mut extended = message.clone().into_bytes();
        extended.extend_from_slice(&suffix);

        let mut headers_a = [Header::EMPTY; 8];
        let mut head_a = RequestHead::new(&mut headers_a);
        let status_a = head_a.parse(message.as_bytes()).expect("well-formed");

        let mut headers_b = [Header::EMPTY; 8];
        let mut head_b = RequestHead::new(&mut headers_b);
        let status_b = head_b.parse(&extended).expect("extension past the head is body");

        prop_assert_eq!(status_a, status_b);
        prop_assert_eq!(head_a.method, head_b.method);
        prop_assert_eq!(head_a.path.map(<[u8]>::to_vec), head_b.path.map(<[u8]>::to_vec));
        prop_assert_eq!(head_a.version, head_b.version);
        prop_assert_eq!(head_a.headers().len(), head_b.headers().len());
    }

    #[test]
    fn every_prefix_of_a_valid_request_is_consistent(
        method in arbitrary_method(),
        path in "[a-zA-Z0-9/_.~-]{0,40}",
        version in arbitrary_version(),
        header_lines in arbitrary_headers(),
        cut in 0usize..512,
    ) {
        let message = render_request(method, &path, version, &header_lines);
        let buf = message.as_bytes();
        let cut = cut.min(buf.len());

        let mut headers = [Header::EMPTY; 8];
        let mut head = RequestHead::new(&mut headers);
        let status = head.parse(&buf[..cut]).expect("a prefix of a valid head is never malformed");
        if cut == buf.len() {
            prop_assert_eq!(status, ParseStatus::Complete(buf.len()));
        } else {
            prop_assert_eq!(status, ParseStatus::Incomplete);
        }
    }

    #[test]
    fn perturbed_method_token_never_yields_a_wrong_method(
        method in arbitrary_method(),
        at in 0usize..4,
        replacement in any::<u8>(),
    ) {
        let message = format!("{method} /index HTTP/1.1\r\n\r\n");
        let mut buf = message.into_bytes();
        let token_len = method.as_str().len().min(4);
        let at = at % token_len;
        prop_assume!(buf[at] != replacement);
        buf[at] = replacement;

        let mut headers = [Header::EMPTY; 4];
        let mut head = RequestHead::new(&mut headers);
        match head.parse(&buf) {
            Err(_) => {}
            Ok(ParseStatus::Incomplete) => {}
            Ok(ParseStatus::Complete(_)) => {
                // No single-byte edit maps one method literal onto another,
                // so a completed parse must not report the original method.
                prop_assert_ne!(head.method, Some(method));
            }
        }
    }
}
