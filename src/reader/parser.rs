use crate::{
    ParseError,
    hls::{Tag, item::MEDIA_INFO_TAG},
};

/// Parse a generic `#EXT...[:value]` directive.
pub fn parse_tag(line: &str) -> Result<Tag, ParseError> {
    let line = line.trim();
    let (name, value) = match line.split_once(':') {
        Some((name, value)) => (name, Some(value)),
        None => (line, None),
    };

    if !name.starts_with("#EXT") || name.len() <= "#EXT".len() {
        return Err(ParseError::InvalidTag(line.to_string()));
    }

    let value = value.filter(|v| !v.is_empty()).map(str::to_string);
    Ok(Tag::new(name, value))
}

/// Parse `#EXTINF:<duration>[,<description>]` into its duration and
/// optional description.
pub fn parse_media_info(line: &str) -> Result<(f64, Option<String>), ParseError> {
    let line = line.trim();
    let content = line
        .strip_prefix(MEDIA_INFO_TAG)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(|| ParseError::InvalidDuration(line.to_string()))?
        .trim_start_matches([' ', '\t']);

    let (duration, rest) =
        split_duration(content).ok_or_else(|| ParseError::InvalidDuration(line.to_string()))?;
    let duration: f64 = duration
        .parse()
        .map_err(|_| ParseError::InvalidDuration(line.to_string()))?;

    let description = rest
        .strip_prefix(',')
        .unwrap_or(rest)
        .trim_start_matches([' ', '\t']);
    let description = (!description.is_empty()).then(|| description.to_string());

    Ok((duration, description))
}

/// Split a leading `-?\d+\.?\d*` number off `s`.
fn split_duration(s: &str) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));

    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
    }

    Some(s.split_at(end))
}
