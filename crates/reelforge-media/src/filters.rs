//! FFmpeg filter builders shared by the rendering operations.

use reelforge_models::{OverlayPosition, OverlayStyle};

/// Pixel margin used by edge-anchored overlay positions.
const EDGE_MARGIN: &str = "50";
/// Baseline offset for bottom-anchored overlays.
const BOTTOM_OFFSET: &str = "h-150";

/// Escape text for drawtext. The backend reserves backslash, single quote,
/// colon and percent inside filter arguments.
pub fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "'\\''")
        .replace(':', "\\:")
        .replace('%', "\\%")
}

/// drawtext x/y expressions for an overlay anchor.
pub fn overlay_position_exprs(position: OverlayPosition) -> (&'static str, &'static str) {
    match position {
        OverlayPosition::TopLeft => (EDGE_MARGIN, EDGE_MARGIN),
        OverlayPosition::TopCenter => ("(w-text_w)/2", EDGE_MARGIN),
        OverlayPosition::TopRight => ("w-text_w-50", EDGE_MARGIN),
        OverlayPosition::Center => ("(w-text_w)/2", "(h-text_h)/2"),
        OverlayPosition::BottomLeft => (EDGE_MARGIN, BOTTOM_OFFSET),
        OverlayPosition::BottomCenter => ("(w-text_w)/2", BOTTOM_OFFSET),
        OverlayPosition::BottomRight => ("w-text_w-50", BOTTOM_OFFSET),
    }
}

/// drawtext filter burning `text` at `position` with a semi-opaque box.
pub fn build_overlay_drawtext(text: &str, position: OverlayPosition, style: &OverlayStyle) -> String {
    let (x, y) = overlay_position_exprs(position);
    format!(
        "drawtext=text='{text}':fontsize={size}:fontcolor={color}:x={x}:y={y}:\
         box=1:boxcolor={box_color}@{opacity}:boxborderw=5",
        text = escape_drawtext(text),
        size = style.font_size,
        color = style.font_color,
        box_color = ffmpeg_color(&style.background_color),
        opacity = style.background_opacity,
    )
}

/// Center-fit scale + pad filter: letterbox onto a black canvas of the
/// target resolution, preserving aspect ratio.
pub fn letterbox(width: u32, height: u32) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2",
        w = width,
        h = height
    )
}

/// Map a document color to FFmpeg's color syntax. Hex `#rrggbb` becomes
/// `0xrrggbb`; named colors pass through unchanged.
pub fn ffmpeg_color(color: &str) -> String {
    match color.strip_prefix('#') {
        Some(hex) if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            format!("0x{hex}")
        }
        _ => color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_reserved_characters() {
        assert_eq!(escape_drawtext("a:b"), "a\\:b");
        assert_eq!(escape_drawtext("100%"), "100\\%");
        assert_eq!(escape_drawtext("it's"), "it'\\''s");
        assert_eq!(escape_drawtext("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_overlay_positions() {
        assert_eq!(
            overlay_position_exprs(OverlayPosition::TopLeft),
            ("50", "50")
        );
        assert_eq!(
            overlay_position_exprs(OverlayPosition::BottomCenter),
            ("(w-text_w)/2", "h-150")
        );
        assert_eq!(
            overlay_position_exprs(OverlayPosition::Center),
            ("(w-text_w)/2", "(h-text_h)/2")
        );
    }

    #[test]
    fn test_overlay_drawtext_filter() {
        let filter = build_overlay_drawtext(
            "Buy now: 50% off",
            OverlayPosition::BottomCenter,
            &OverlayStyle::default(),
        );
        assert!(filter.contains("text='Buy now\\: 50\\% off'"));
        assert!(filter.contains("fontsize=48"));
        assert!(filter.contains("boxcolor=black@0.5"));
        assert!(filter.contains("y=h-150"));
    }

    #[test]
    fn test_letterbox_filter() {
        let filter = letterbox(1080, 1920);
        assert!(filter.contains("scale=1080:1920:force_original_aspect_ratio=decrease"));
        assert!(filter.contains("pad=1080:1920:(ow-iw)/2:(oh-ih)/2"));
    }

    #[test]
    fn test_color_mapping() {
        assert_eq!(ffmpeg_color("#1a2b3c"), "0x1a2b3c");
        assert_eq!(ffmpeg_color("black"), "black");
        assert_eq!(ffmpeg_color("#nothex"), "#nothex");
    }
}
