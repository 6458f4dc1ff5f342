use kacky_core::ServerView;

const NEXT_MAPS_SHOWN: usize = 3;

/// Box-drawn roster table.
///
/// The minimal layout keeps only the server, map and countdown columns.
pub struct TableFormatter {
    minimal: bool,
    server_width: usize,
    tier_width: usize,
    map_width: usize,
    next_width: usize,
    countdown_width: usize,
    join_width: usize,
}

impl TableFormatter {
    pub fn new(servers: &[ServerView], minimal: bool) -> Self {
        let server_width = servers
            .iter()
            .map(|s| s.server_id.as_str().chars().count())
            .max()
            .unwrap_or(6)
            .clamp(6, 12);

        let join_width = servers
            .iter()
            .map(|s| s.join_target.chars().count())
            .max()
            .unwrap_or(4)
            .clamp(4, 30);

        Self {
            minimal,
            server_width,
            tier_width: 8,
            map_width: 12,
            next_width: 18,
            countdown_width: 9,
            join_width,
        }
    }

    pub fn render(&self, servers: &[&ServerView]) -> String {
        let mut out = String::new();
        out.push_str(&self.border('┌', '┬', '┐'));
        out.push('\n');
        out.push_str(&self.row(&self.header_cells()));
        out.push('\n');
        out.push_str(&self.border('├', '┼', '┤'));
        out.push('\n');
        for server in servers {
            out.push_str(&self.row(&self.server_cells(server)));
            out.push('\n');
        }
        out.push_str(&self.border('└', '┴', '┘'));
        out.push('\n');
        out
    }

    fn widths(&self) -> Vec<usize> {
        if self.minimal {
            vec![self.server_width, self.map_width, self.countdown_width]
        } else {
            vec![
                self.server_width,
                self.tier_width,
                self.map_width,
                self.next_width,
                self.countdown_width,
                self.join_width,
            ]
        }
    }

    fn header_cells(&self) -> Vec<String> {
        let headers: &[&str] = if self.minimal {
            &["Server", "Map", "Next in"]
        } else {
            &["Server", "Tier", "Map", "Up next", "Next in", "Join"]
        };
        headers.iter().map(|h| h.to_string()).collect()
    }

    fn server_cells(&self, server: &ServerView) -> Vec<String> {
        let map = server
            .current_map()
            .map(|map| {
                if map.finished {
                    format!("#{} ✓", map.number)
                } else {
                    format!("#{}", map.number)
                }
            })
            .unwrap_or_else(|| "-".to_string());

        if self.minimal {
            return vec![server.server_id.to_string(), map, server.countdown()];
        }

        let next = server
            .maps
            .iter()
            .skip(1)
            .take(NEXT_MAPS_SHOWN)
            .map(|map| format!("#{}", map.number))
            .collect::<Vec<_>>()
            .join(" ");

        vec![
            server.server_id.to_string(),
            server.difficulty.label().to_string(),
            map,
            next,
            server.countdown(),
            server.join_target.clone(),
        ]
    }

    fn row(&self, cells: &[String]) -> String {
        let body = cells
            .iter()
            .zip(self.widths())
            .map(|(cell, width)| truncate(cell, width))
            .collect::<Vec<_>>()
            .join(" │ ");
        format!("│ {} │", body)
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let segments = self
            .widths()
            .into_iter()
            .map(|width| "─".repeat(width + 2))
            .collect::<Vec<_>>()
            .join(&middle.to_string());
        format!("{}{}{}", left, segments, right)
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Counts characters, not bytes, so multi-byte text is cut safely.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
