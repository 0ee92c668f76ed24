// File: octothorpe/src/encode.rs
// Purpose: Percent-encoding tailored to the fragment segment grammar

use std::borrow::Cow;

/// Characters that never need escaping inside a fragment segment.
///
/// This is the RFC 3986 unreserved set widened with the sub-delims that are
/// harmless inside a fragment (`!$&'()*+`), plus `.`, `/`, `:`, `?`, `@` and
/// `~`. Anything outside this set is percent-encoded, which makes `;` (the
/// segment delimiter) always encoded. `=` and `,` are base-safe here and get
/// reserved per call site instead: `=` for parameter names, and whatever a
/// parameter type declares for its values.
const BASE_SAFE: &str = "-!$&'()*+./:?@_~,=";

fn is_base_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || BASE_SAFE.contains(c)
}

/// Builds a percent-encoder that additionally reserves `extra_reserved`.
///
/// The returned closure is a total function: any input string maps to a
/// string that is safe to place in a `;`-delimited, `=`-separated segment.
/// Unsafe characters are replaced by the uppercase-hex percent-encoding of
/// their UTF-8 bytes.
pub fn make_encoder(extra_reserved: &[char]) -> impl Fn(&str) -> String + '_ {
    move |input| encode_component(input, extra_reserved)
}

/// Percent-encodes `input`, escaping everything outside the base-safe set
/// plus every character in `extra_reserved`.
pub fn encode_component(input: &str, extra_reserved: &[char]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut buf = [0u8; 4];
    for c in input.chars() {
        if is_base_safe(c) && !extra_reserved.contains(&c) {
            out.push(c);
        } else {
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    out
}

/// Percent-decodes one name or value payload.
///
/// Undecodable input (percent sequences that do not form valid UTF-8) falls
/// back to the empty string rather than erroring; hosts hand us arbitrary
/// location fragments and a broken one should behave like an absent value.
pub fn decode_component(input: &str) -> String {
    urlencoding::decode(input)
        .map(Cow::into_owned)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hello", "hello")]
    #[case("hello world", "hello%20world")]
    #[case("a;b", "a%3Bb")]
    #[case("-!$&'()*+./:?@_~", "-!$&'()*+./:?@_~")]
    #[case("a,b=c", "a,b=c")]
    #[case("100%", "100%25")]
    #[case("caf\u{e9}", "caf%C3%A9")]
    fn encodes_without_extra_reserved(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(encode_component(input, &[]), expected);
    }

    #[rstest]
    #[case(&[','], "a,b", "a%2Cb")]
    #[case(&['=', ','], "a=b,c", "a%3Db%2Cc")]
    #[case(&['='], "k=v", "k%3Dv")]
    fn extra_reserved_chars_are_escaped(
        #[case] reserved: &[char],
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(encode_component(input, reserved), expected);
    }

    #[test]
    fn encoder_factory_captures_reserved_set() {
        let encode = make_encoder(&[',']);
        assert_eq!(encode("x,y"), "x%2Cy");
        assert_eq!(encode("x=y"), "x=y");
    }

    #[test]
    fn decode_reverses_encode() {
        let original = "hello world; 100% caf\u{e9}, a=b";
        let encoded = encode_component(original, &['=', ',']);
        assert_eq!(decode_component(&encoded), original);
    }

    #[test]
    fn decode_of_invalid_utf8_sequence_is_empty() {
        assert_eq!(decode_component("%FF%FE"), "");
    }
}
