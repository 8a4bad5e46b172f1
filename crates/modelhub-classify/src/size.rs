/// Aspect-ratio lookup tables for the image and video payload builders.
/// Unknown ratios fall back to the caller-supplied default.

const IMAGE_SIZES: [(&str, &str); 3] = [
    ("1:1", "1024x1024"),
    ("16:9", "1792x1024"),
    ("9:16", "1024x1792"),
];

const VIDEO_RESOLUTIONS: [(&str, &str); 3] = [
    ("16:9", "1920x1080"),
    ("9:16", "1080x1920"),
    ("1:1", "1024x1024"),
];

pub fn image_size_for_ratio<'a>(ratio: &str, default: &'a str) -> &'a str {
    lookup(&IMAGE_SIZES, ratio).unwrap_or(default)
}

pub fn video_resolution_for_ratio<'a>(ratio: &str, default: &'a str) -> &'a str {
    lookup(&VIDEO_RESOLUTIONS, ratio).unwrap_or(default)
}

/// Split a "WxH" size string into numeric width and height.
pub fn parse_size(size: &str) -> Option<(u32, u32)> {
    let (width, height) = size.split_once('x')?;
    Some((width.parse().ok()?, height.parse().ok()?))
}

fn lookup(table: &[(&str, &'static str)], ratio: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == ratio)
        .map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widescreen_maps_differently_per_modality() {
        assert_eq!(image_size_for_ratio("16:9", "1024x1024"), "1792x1024");
        assert_eq!(video_resolution_for_ratio("16:9", "1280x720"), "1920x1080");
    }

    #[test]
    fn unknown_ratio_falls_back_to_default() {
        assert_eq!(image_size_for_ratio("21:9", "1024x1024"), "1024x1024");
        assert_eq!(video_resolution_for_ratio("4:3", "1280x720"), "1280x720");
    }

    #[test]
    fn portrait_ratios() {
        assert_eq!(image_size_for_ratio("9:16", "1024x1024"), "1024x1792");
        assert_eq!(video_resolution_for_ratio("9:16", "1280x720"), "1080x1920");
    }

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("1792x1024"), Some((1792, 1024)));
        assert_eq!(parse_size("not-a-size"), None);
        assert_eq!(parse_size("12x"), None);
    }
}
