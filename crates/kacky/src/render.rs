use kacky_core::countdown::group_by_difficulty;
use kacky_core::{EventInfo, Frame, FrameStatus, ServerView};

use crate::table::TableFormatter;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub minimal: bool,
    pub group: bool,
}

/// Render a whole screen: status header followed by the roster table(s).
pub fn render_frame(frame: &Frame, event: &EventInfo, options: RenderOptions) -> String {
    let mut out = String::new();
    out.push_str(&header_line(frame, event));
    out.push('\n');

    // A stale frame keeps its table; the header marker is the only hint
    if frame.status() == FrameStatus::Loading {
        match &frame.last_error {
            Some(error) => out.push_str(&format!("Could not load the roster: {}\n", error)),
            None => out.push_str("Loading roster...\n"),
        }
        return out;
    }

    if frame.servers.is_empty() {
        out.push_str("No servers are running.\n");
        return out;
    }

    let formatter = TableFormatter::new(&frame.servers, options.minimal);
    if options.group {
        for group in group_by_difficulty(&frame.servers) {
            out.push('\n');
            out.push_str(&format!(
                "{} ({})\n",
                group.difficulty.label(),
                group.servers.len()
            ));
            out.push_str(&formatter.render(&group.servers));
        }
    } else {
        let servers: Vec<&ServerView> = frame.servers.iter().collect();
        out.push_str(&formatter.render(&servers));
    }

    out
}

fn header_line(frame: &Frame, event: &EventInfo) -> String {
    let mut line = event.title();
    if !event.status.is_empty() && !event.is_active() {
        line.push_str(&format!(" ({})", event.status));
    }
    line.push_str(&format!(" [{}]", frame.status().as_str()));
    if let Some(fetched_at) = frame.fetched_at {
        line.push_str(&format!(" updated {} UTC", fetched_at.format("%H:%M:%S")));
    }
    line
}
