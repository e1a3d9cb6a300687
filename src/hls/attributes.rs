use crate::ParseError;

/// Split an attribute list (`KEY=VALUE,KEY="quoted, value"`) into pairs.
///
/// Quoted values are returned without their quotes and with their content
/// untouched. Empty segments between commas are ignored.
pub fn parse_attribute_list(s: &str) -> Result<Vec<(&str, &str)>, ParseError> {
    let mut pairs = Vec::new();

    for attr in split_attributes(s)? {
        if attr.is_empty() {
            continue;
        }

        let (key, value) = attr
            .split_once('=')
            .ok_or_else(|| ParseError::MalformedAttributeList(s.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ParseError::MalformedAttributeList(s.to_string()));
        }

        pairs.push((key, unquote(value.trim(), s)?));
    }

    Ok(pairs)
}

fn split_attributes(s: &str) -> Result<Vec<&str>, ParseError> {
    let mut attrs = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                attrs.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_quotes {
        return Err(ParseError::MalformedAttributeList(s.to_string()));
    }

    if start < s.len() {
        attrs.push(s[start..].trim());
    }

    Ok(attrs)
}

fn unquote<'a>(value: &'a str, list: &str) -> Result<&'a str, ParseError> {
    match value.strip_prefix('"') {
        Some(rest) => rest
            .strip_suffix('"')
            .ok_or_else(|| ParseError::MalformedAttributeList(list.to_string())),
        None => Ok(value),
    }
}
