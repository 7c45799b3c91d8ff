use serde::{Deserialize, Serialize};

/// Field paths a partial update is restricted to.
///
/// Paths are kept in proto snake_case; the wire form used by the REST API is
/// lowerCamelCase joined by commas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldMask(Vec<String>);

impl FieldMask {
    /// Creates a mask from field paths.
    #[must_use]
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }

    /// Mask covering only the agent advanced settings.
    #[must_use]
    pub fn advanced_settings() -> Self {
        Self::new(["advanced_settings"])
    }

    /// Mask covering the legacy agent logging flag.
    #[must_use]
    pub fn legacy_logging() -> Self {
        Self::new(["enable_logging"])
    }

    /// Mask covering the static credentials of a generic web service.
    #[must_use]
    pub fn web_service_credentials() -> Self {
        Self::new([
            "generic_web_service.username",
            "generic_web_service.password",
        ])
    }

    /// Returns the snake_case field paths.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        self.0.as_slice()
    }

    /// Returns whether the mask includes `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|candidate| candidate == path)
    }

    /// Renders the `updateMask` query parameter value.
    #[must_use]
    pub fn to_query_value(&self) -> String {
        self.0
            .iter()
            .map(|path| {
                path.split('.')
                    .map(lower_camel_case)
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn lower_camel_case(segment: &str) -> String {
    let mut output = String::with_capacity(segment.len());
    let mut uppercase_next = false;
    for character in segment.chars() {
        if character == '_' {
            uppercase_next = true;
        } else if uppercase_next {
            output.extend(character.to_uppercase());
            uppercase_next = false;
        } else {
            output.push(character);
        }
    }

    output
}
