//! Text slide rendering.
//!
//! A slide is a fixed-duration clip of word-wrapped text drawn centered on a
//! solid background at the target resolution.

use std::path::Path;
use tracing::info;

use reelforge_models::encoding::FPS;
use reelforge_models::EncodingProfile;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::filters::{escape_drawtext, ffmpeg_color};

/// Slide text size in pixels.
const SLIDE_FONT_SIZE: u32 = 72;
/// Horizontal margin kept clear on both sides combined.
const SLIDE_MARGIN: u32 = 100;
/// Approximate advance width of a glyph as a fraction of the font size,
/// used to estimate how many characters fit on a line.
const GLYPH_ADVANCE_RATIO: f64 = 0.55;

/// Render a text slide clip.
///
/// `background_color` defaults to black; hex `#rrggbb` values are accepted.
pub async fn text_slide(
    text: &str,
    background_color: Option<&str>,
    duration: f64,
    width: u32,
    height: u32,
    output: impl AsRef<Path>,
    profile: &EncodingProfile,
) -> MediaResult<()> {
    let output = output.as_ref();
    let background = ffmpeg_color(background_color.unwrap_or("black"));

    let wrapped = wrap_text(text, max_chars_per_line(width));
    let filter = format!(
        "drawtext=text='{text}':fontsize={size}:fontcolor=white:\
         x=(w-text_w)/2:y=(h-text_h)/2",
        text = escape_drawtext(&wrapped),
        size = SLIDE_FONT_SIZE,
    );

    let source = format!(
        "color=c={background}:s={width}x{height}:r={fps}:d={duration:.3}",
        fps = FPS,
    );

    info!(
        "Rendering text slide ({}x{}, {:.1}s) -> {}",
        width,
        height,
        duration,
        output.display()
    );

    let cmd = FfmpegCommand::new(source, output)
        .format("lavfi")
        .video_filter(filter)
        .output_args(profile.video_args());

    FfmpegRunner::new().run(&cmd).await
}

/// Characters that fit on one slide line at the given canvas width.
fn max_chars_per_line(width: u32) -> usize {
    let usable = width.saturating_sub(SLIDE_MARGIN) as f64;
    let advance = SLIDE_FONT_SIZE as f64 * GLYPH_ADVANCE_RATIO;
    ((usable / advance) as usize).max(1)
}

/// Greedy word wrap. Words longer than a line are kept whole on their own
/// line rather than split.
fn wrap_text(text: &str, max_chars: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_text_single_line() {
        assert_eq!(wrap_text("hello world", 40), "hello world");
    }

    #[test]
    fn test_wrap_breaks_on_word_boundaries() {
        let wrapped = wrap_text("one two three four", 9);
        assert_eq!(wrapped, "one two\nthree\nfour");
        for line in wrapped.lines() {
            assert!(line.len() <= 9);
        }
    }

    #[test]
    fn test_wrap_keeps_long_word_whole() {
        let wrapped = wrap_text("a incomprehensibilities b", 10);
        assert_eq!(wrapped, "a\nincomprehensibilities\nb");
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        assert_eq!(wrap_text("  a   b  ", 40), "a b");
    }

    #[test]
    fn test_max_chars_scales_with_width() {
        assert!(max_chars_per_line(1920) > max_chars_per_line(1080));
        assert_eq!(max_chars_per_line(0), 1);
    }
}
