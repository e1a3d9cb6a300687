use crate::{ParseError, hls::attributes::parse_attribute_list};

pub const KEY_TAG: &str = "#EXT-X-KEY";

/// Represents an HLS encryption method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMethod {
    None,
    Aes128,
    SampleAes,
    Unknown(String),
}

impl KeyMethod {
    /// Parse from EXT-X-KEY METHOD attribute value.
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "NONE" => Self::None,
            "AES-128" => Self::Aes128,
            "SAMPLE-AES" => Self::SampleAes,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "NONE",
            Self::Aes128 => "AES-128",
            Self::SampleAes => "SAMPLE-AES",
            Self::Unknown(s) => s.as_str(),
        }
    }
}

/// Key URL of a media file.
///
/// `Unspecified` means the file inherits whatever key is in effect, while
/// `None` explicitly switches encryption off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeyUrl {
    #[default]
    Unspecified,
    None,
    Url(String),
}

impl KeyUrl {
    pub fn is_specified(&self) -> bool {
        !matches!(self, Self::Unspecified)
    }

    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            _ => None,
        }
    }
}

impl From<Option<String>> for KeyUrl {
    fn from(url: Option<String>) -> Self {
        url.map_or(Self::None, Self::Url)
    }
}

/// Key state carried by an #EXT-X-KEY line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub method: KeyMethod,
    pub url: KeyUrl,
    pub iv: Option<String>,
}

impl KeyInfo {
    /// Parse from #EXT-X-KEY tag line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let content = line
            .trim()
            .strip_prefix(KEY_TAG)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| ParseError::InvalidTag(line.to_string()))?;

        let mut method = KeyMethod::None;
        let mut uri = None;
        let mut iv = None;

        for (key, value) in parse_attribute_list(content)? {
            match key.to_uppercase().as_str() {
                "METHOD" => method = KeyMethod::parse(value),
                "URI" => uri = Some(value.replace("%22", "\"")),
                "IV" => iv = Some(value.to_string()),
                _ => {}
            }
        }

        if method == KeyMethod::None {
            return Ok(Self {
                method,
                url: KeyUrl::None,
                iv: None,
            });
        }

        let uri = uri.ok_or_else(|| ParseError::MissingKeyUri(method.as_str().to_string()))?;
        Ok(Self {
            method,
            url: KeyUrl::Url(uri),
            iv,
        })
    }
}

/// IV a player derives from a media sequence number when none is given.
pub fn format_iv(sequence: u64) -> String {
    format!("0x{}", hex::encode(u128::from(sequence).to_be_bytes()))
}

/// Render a key URL as the quoted URI attribute value.
pub fn quote_uri(url: &str) -> String {
    let cleaned: String = url
        .replace('"', "%22")
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect();
    format!("\"{}\"", cleaned.trim())
}
