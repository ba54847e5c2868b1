//! Call-stack capture for log entries
//!
//! Produces the `\n<file>:<line>` segments appended by the default formatter.

use std::backtrace::Backtrace;

struct Frame {
    symbol: String,
    location: Option<(String, u32)>,
}

/// Capture up to `max_depth` frames of the caller's stack
///
/// The capture machinery itself is never reported. After it, `skip` further
/// frames are dropped, then every frame whose file path contains `filter`
/// (or every frame, when `filter` is empty) is emitted as `\n<file>:<line>`.
/// Frames without location information are skipped.
pub fn capture(skip: usize, max_depth: usize, filter: &str) -> String {
    if max_depth == 0 {
        return String::new();
    }
    render(
        frames().into_iter().skip_while(is_capture_frame).skip(skip),
        max_depth,
        filter,
    )
}

/// Like [`capture`], but also drops the leading frames that belong to `module`
pub(crate) fn capture_outside(module: &str, max_depth: usize, filter: &str) -> String {
    if max_depth == 0 {
        return String::new();
    }
    render(
        frames()
            .into_iter()
            .skip_while(|frame| is_capture_frame(frame) || frame.symbol.starts_with(module)),
        max_depth,
        filter,
    )
}

fn is_capture_frame(frame: &Frame) -> bool {
    // also covers std::backtrace_rs
    frame.symbol.starts_with("std::backtrace") || frame.symbol.starts_with(module_path!())
}

fn render(frames: impl Iterator<Item = Frame>, max_depth: usize, filter: &str) -> String {
    let mut out = String::new();
    let mut depth = 0;
    for frame in frames {
        if depth >= max_depth {
            break;
        }
        if let Some((file, line)) = frame.location {
            if filter.is_empty() || file.contains(filter) {
                out.push('\n');
                out.push_str(&file);
                out.push(':');
                out.push_str(&line.to_string());
                depth += 1;
            }
        }
    }
    out
}

/// Parse the full (`{:#}`) `Display` form of a forced backtrace:
///
/// ```text
///    4: my_app::handler::h0123456789abcdef
///              at /home/me/my_app/src/handler.rs:42:9
/// ```
fn frames() -> Vec<Frame> {
    // Full format keeps absolute paths; the short one makes them cwd-relative.
    let text = format!("{:#}", Backtrace::force_capture());
    let mut frames: Vec<Frame> = Vec::new();

    for line in text.lines() {
        let line = line.trim_start();
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                if frame.location.is_none() {
                    frame.location = parse_location(location);
                }
            }
        } else if let Some((index, symbol)) = line.split_once(": ") {
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                frames.push(Frame {
                    symbol: symbol.trim().to_string(),
                    location: None,
                });
            }
        }
    }
    frames
}

fn parse_location(text: &str) -> Option<(String, u32)> {
    let mut parts = text.trim().rsplitn(3, ':');
    let last = parts.next()?;
    let middle = parts.next()?;
    match parts.next() {
        // path:line:column
        Some(path) => Some((path.to_string(), middle.parse().ok()?)),
        // path:line
        None => Some((middle.to_string(), last.parse().ok()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_depth_is_empty() {
        assert_eq!(capture(0, 0, ""), "");
    }

    fn frame(symbol: &str, location: Option<(&str, u32)>) -> Frame {
        Frame {
            symbol: symbol.to_string(),
            location: location.map(|(file, line)| (file.to_string(), line)),
        }
    }

    #[test]
    fn test_capture_has_exact_depth() {
        let stack = capture(0, 2, "");
        let segments: Vec<&str> = stack.split('\n').skip(1).collect();

        assert!(stack.starts_with('\n'), "empty capture: {:?}", stack);
        assert_eq!(segments.len(), 2, "stack: {:?}", stack);
        for segment in segments {
            let (file, line) = segment.rsplit_once(':').expect("file:line");
            assert!(!file.is_empty());
            assert!(line.parse::<u32>().is_ok());
        }
    }

    #[test]
    fn test_capture_reports_absolute_paths() {
        let stack = capture(0, 1, "");
        let file = stack.trim_start_matches('\n').rsplit_once(':').expect("file:line").0;
        assert!(std::path::Path::new(file).is_absolute(), "relative path {:?}", file);
    }

    #[test]
    fn test_render_skips_frames_without_location() {
        let frames = vec![
            frame("app::a", Some(("/src/a.rs", 1))),
            frame("app::b", None),
            frame("app::c", Some(("/src/c.rs", 3))),
            frame("app::d", Some(("/src/d.rs", 4))),
        ];
        assert_eq!(render(frames.into_iter(), 2, ""), "\n/src/a.rs:1\n/src/c.rs:3");
    }

    #[test]
    fn test_render_filter_keeps_matching_paths_only() {
        let frames = vec![
            frame("std::rt", Some(("/rustc/library/std/src/rt.rs", 10))),
            frame("app::handler", Some(("/work/app/src/handler.rs", 42))),
            frame("app::main", Some(("/work/app/src/main.rs", 7))),
            frame("app::handler", Some(("/work/app/src/handler.rs", 50))),
        ];
        assert_eq!(
            render(frames.into_iter(), 8, "handler.rs"),
            "\n/work/app/src/handler.rs:42\n/work/app/src/handler.rs:50"
        );
    }

    #[test]
    fn test_parse_location() {
        assert_eq!(
            parse_location("./src/main.rs:42:9"),
            Some(("./src/main.rs".to_string(), 42))
        );
        assert_eq!(
            parse_location("/tmp/lib.rs:7"),
            Some(("/tmp/lib.rs".to_string(), 7))
        );
        assert_eq!(parse_location("nowhere"), None);
    }
}
