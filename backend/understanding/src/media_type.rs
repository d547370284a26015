//! Declared media type resolution and the accepted image types.

use captionforge_core::RelayError;

/// Type assumed when the upload carries no (or an empty) content type.
pub const FALLBACK_MEDIA_TYPE: &str = "image/jpeg";

/// Image types the relay forwards upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Jpeg,
    Png,
    Webp,
}

impl MediaType {
    pub const ALL: [MediaType; 3] = [MediaType::Jpeg, MediaType::Png, MediaType::Webp];

    /// Exact, case-sensitive match against the accepted types.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substitute the fallback for an absent or empty declared type.
pub fn resolve_media_type(declared: Option<&str>) -> &str {
    match declared {
        Some(value) if !value.is_empty() => value,
        _ => FALLBACK_MEDIA_TYPE,
    }
}

/// Resolve then validate a declared type.
pub fn check_media_type(declared: Option<&str>) -> Result<MediaType, RelayError> {
    let resolved = resolve_media_type(declared);
    MediaType::parse(resolved).ok_or_else(|| RelayError::UnsupportedMediaType(resolved.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_empty_resolves_to_jpeg() {
        assert_eq!(resolve_media_type(None), "image/jpeg");
        assert_eq!(resolve_media_type(Some("")), "image/jpeg");
        assert_eq!(check_media_type(None).unwrap(), MediaType::Jpeg);
    }

    #[test]
    fn accepts_the_three_image_types() {
        for media_type in MediaType::ALL {
            assert_eq!(check_media_type(Some(media_type.as_str())).unwrap(), media_type);
        }
    }

    #[test]
    fn rejects_everything_else() {
        for declared in ["text/plain", "application/pdf", "image/gif", "IMAGE/PNG", "image/png; q=1"] {
            let err = check_media_type(Some(declared)).unwrap_err();
            assert_eq!(err.to_string(), format!("Unsupported file type: {declared}"));
        }
    }
}
