use crate::{ParseError, hls::attributes::parse_attribute_list};

pub const STREAM_INF_TAG: &str = "#EXT-X-STREAM-INF";
const LEGACY_STREAM_INF_TAG: &str = "#EXT-STREAM-INF";

#[derive(Debug, Clone, Copy)]
enum StreamAttribute {
    Bandwidth,
    ProgramId,
    Codecs,
    Resolution,
}

/// Attributes retained from #EXT-X-STREAM-INF; everything else is dropped.
const STREAM_ATTRIBUTES: &[(&str, StreamAttribute)] = &[
    ("BANDWIDTH", StreamAttribute::Bandwidth),
    ("PROGRAM-ID", StreamAttribute::ProgramId),
    ("CODECS", StreamAttribute::Codecs),
    ("RESOLUTION", StreamAttribute::Resolution),
];

/// A variant stream entry of a master playlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantStream {
    pub path: String,
    pub bandwidth: Option<u64>,
    pub program_id: Option<u32>,
    pub codecs: Option<String>,
    pub resolution: Option<String>,
}

impl VariantStream {
    pub fn new(path: impl Into<String>, bandwidth: u64) -> Self {
        Self {
            path: path.into(),
            bandwidth: Some(bandwidth),
            ..Default::default()
        }
    }

    pub fn with_program_id(mut self, program_id: u32) -> Self {
        self.program_id = Some(program_id);
        self
    }

    pub fn with_codecs(mut self, codecs: impl Into<String>) -> Self {
        self.codecs = Some(codecs.into());
        self
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    /// Parse from #EXT-X-STREAM-INF tag line. The path is left empty.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let content = line
            .strip_prefix(STREAM_INF_TAG)
            .or_else(|| line.strip_prefix(LEGACY_STREAM_INF_TAG))
            .map(|rest| rest.strip_prefix(':').unwrap_or(rest))
            .ok_or_else(|| ParseError::InvalidTag(line.to_string()))?;

        let mut stream = Self::default();

        for (key, value) in parse_attribute_list(content)? {
            let Some((_, attr)) = STREAM_ATTRIBUTES
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key))
            else {
                continue;
            };

            let invalid = || ParseError::InvalidAttribute {
                name: key.to_string(),
                value: value.to_string(),
            };

            match attr {
                StreamAttribute::Bandwidth => {
                    stream.bandwidth = Some(value.parse().map_err(|_| invalid())?)
                }
                StreamAttribute::ProgramId => {
                    stream.program_id = Some(value.parse().map_err(|_| invalid())?)
                }
                StreamAttribute::Codecs => stream.codecs = Some(value.to_string()),
                StreamAttribute::Resolution => stream.resolution = Some(value.to_string()),
            }
        }

        Ok(stream)
    }

    pub fn is_valid(&self) -> bool {
        !self.path.is_empty() && self.bandwidth.is_some()
    }

    pub fn render(&self) -> String {
        let mut attrs = Vec::new();
        if let Some(program_id) = self.program_id {
            attrs.push(format!("PROGRAM-ID={}", program_id));
        }
        if let Some(bandwidth) = self.bandwidth {
            attrs.push(format!("BANDWIDTH={}", bandwidth));
        }
        if let Some(codecs) = &self.codecs {
            attrs.push(format!("CODECS=\"{}\"", codecs));
        }
        if let Some(resolution) = &self.resolution {
            attrs.push(format!("RESOLUTION={}", resolution));
        }

        format!("{}:{}\n{}", STREAM_INF_TAG, attrs.join(","), self.path)
    }
}
