use rand::Rng;

/// One decoded step of an action script.
///
/// Decoded once at load time from the source record; the interpreter never
/// re-inspects raw JSON during execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStep {
    /// Enqueue the file for playback.
    Play(String),
    /// Enqueue after substituting each `[a..b]` token with a sampled value.
    PlayRandomFromRange(String),
    /// Enqueue one uniformly chosen path from the list (never empty).
    PlayRandomFromChoices(Vec<String>),
    /// Suspend the chain for this many seconds.
    Wait(u64),
    /// Surface a toast message.
    Toast(String),
    /// Unknown op or malformed record, kept in place so step indices still
    /// line up with the source file; the interpreter logs and skips it.
    Malformed(String),
}

/// Substitute every `[a..b]` (or `[a.b]`) token in `pattern` with one
/// uniformly sampled integer in `[min(a,b), max(a,b)]`.
///
/// Each token is sampled independently, and every call resamples. Text that
/// merely looks like a token (`[x..3]`, unbalanced brackets) passes through
/// unchanged.
pub fn substitute_ranges(pattern: &str) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        match parse_range_token(&rest[open..]) {
            Some((consumed, lo, hi)) => {
                out.push_str(&rng.gen_range(lo..=hi).to_string());
                rest = &rest[open + consumed..];
            }
            None => {
                out.push('[');
                rest = &rest[open + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parse a range token at the start of `s` (which begins with `[`).
/// Accepts `[a..b]` and `[a.b]`, with spaces allowed around the dots.
/// Returns (bytes consumed, lo, hi) with reversed bounds normalised.
fn parse_range_token(s: &str) -> Option<(usize, u32, u32)> {
    let bytes = s.as_bytes();
    let mut i = 1; // past '['

    let a = take_digits(bytes, &mut i)?;
    skip_spaces(bytes, &mut i);
    if bytes.get(i) != Some(&b'.') {
        return None;
    }
    i += 1;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
    }
    skip_spaces(bytes, &mut i);
    let b = take_digits(bytes, &mut i)?;
    if bytes.get(i) != Some(&b']') {
        return None;
    }
    i += 1;

    Some((i, a.min(b), a.max(b)))
}

fn take_digits(bytes: &[u8], i: &mut usize) -> Option<u32> {
    let start = *i;
    while bytes.get(*i).is_some_and(u8::is_ascii_digit) {
        *i += 1;
    }
    if *i == start {
        return None;
    }
    std::str::from_utf8(&bytes[start..*i]).ok()?.parse().ok()
}

fn skip_spaces(bytes: &[u8], i: &mut usize) {
    while bytes.get(*i) == Some(&b' ') {
        *i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_token_samples_within_bounds() {
        for _ in 0..50 {
            let resolved = substitute_ranges("clip_[1..3].mp4");
            assert!(
                ["clip_1.mp4", "clip_2.mp4", "clip_3.mp4"].contains(&resolved.as_str()),
                "unexpected resolution: {resolved}"
            );
        }
    }

    #[test]
    fn single_dot_form_accepted() {
        for _ in 0..20 {
            let resolved = substitute_ranges("intro [2.4].mp4");
            assert!(["intro 2.mp4", "intro 3.mp4", "intro 4.mp4"].contains(&resolved.as_str()));
        }
    }

    #[test]
    fn reversed_bounds_are_normalised() {
        for _ in 0..20 {
            let resolved = substitute_ranges("x[3..1]y");
            assert!(["x1y", "x2y", "x3y"].contains(&resolved.as_str()));
        }
    }

    #[test]
    fn degenerate_range_is_deterministic() {
        assert_eq!(substitute_ranges("clip_[7..7].mp4"), "clip_7.mp4");
    }

    #[test]
    fn multiple_tokens_sampled_independently() {
        let resolved = substitute_ranges("[1..1]-[5..5].mp4");
        assert_eq!(resolved, "1-5.mp4");
    }

    #[test]
    fn spaces_around_dots_accepted() {
        assert_eq!(substitute_ranges("c[2 .. 2].mp4"), "c2.mp4");
    }

    #[test]
    fn non_tokens_pass_through() {
        assert_eq!(substitute_ranges("plain.mp4"), "plain.mp4");
        assert_eq!(substitute_ranges("odd[x..3].mp4"), "odd[x..3].mp4");
        assert_eq!(substitute_ranges("open[1..2"), "open[1..2");
        assert_eq!(substitute_ranges("empty[].mp4"), "empty[].mp4");
    }
}
