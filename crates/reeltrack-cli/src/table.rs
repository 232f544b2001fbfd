//! Plain-text rendering of dashboard and campaign rows for the terminal.

use std::fmt::Write;

use reeltrack_core::render::{KpiTile, PostRowView};
use reeltrack_core::{CampaignRender, DashboardRender, SortMode};

fn write_line<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// Left-aligned columns sized to their widest cell, separated by two spaces.
fn write_table(out: &mut String, headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_line(out, &widths, headers.iter().copied());
    for row in rows {
        write_line(out, &widths, row.iter().map(String::as_str));
    }
}

fn write_kpis(out: &mut String, kpis: &[KpiTile]) {
    let tiles: Vec<String> = kpis
        .iter()
        .map(|k| format!("{}: {}", k.label, k.value))
        .collect();
    let _ = writeln!(out, "{}", tiles.join("   "));
}

fn status_cell(post: &PostRowView) -> String {
    format!("[{}] {}", post.status.category, post.status.text)
}

fn sort_hint(sort: SortMode) -> String {
    format!("Sorted by views ({sort}); use --sort {} to flip.", sort.toggled())
}

#[must_use]
pub fn dashboard_text(render: &DashboardRender, sort: SortMode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Generated {}", render.generated_at);
    write_kpis(&mut out, &render.kpis);

    out.push('\n');
    let campaign_rows: Vec<Vec<String>> = render
        .campaigns
        .iter()
        .map(|c| {
            vec![
                c.campaign_id.to_string(),
                c.name.clone(),
                c.posts.clone(),
                c.views.clone(),
                c.likes.clone(),
                c.comments.clone(),
                c.href.clone(),
            ]
        })
        .collect();
    write_table(
        &mut out,
        &["ID", "CAMPAIGN", "POSTS", "VIEWS", "LIKES", "COMMENTS", "PAGE"],
        &campaign_rows,
    );

    out.push('\n');
    let _ = writeln!(out, "{}", sort_hint(sort));
    let post_rows: Vec<Vec<String>> = render
        .posts
        .iter()
        .map(|p| {
            vec![
                p.post_id.to_string(),
                p.delete
                    .as_ref()
                    .map_or_else(String::new, |d| d.creator_id.to_string()),
                format!("{} (@{})", p.creator_label, p.creator_handle),
                p.campaign_name.clone().unwrap_or_default(),
                p.followers.clone(),
                p.views.clone(),
                p.likes.clone(),
                p.comments.clone(),
                status_cell(p),
                p.last_snapshot.clone(),
                p.post_url.clone(),
            ]
        })
        .collect();
    write_table(
        &mut out,
        &[
            "POST", "CREATOR ID", "CREATOR", "CAMPAIGN", "FOLLOWERS", "VIEWS", "LIKES",
            "COMMENTS", "STATUS", "LAST SNAPSHOT", "URL",
        ],
        &post_rows,
    );
    out
}

#[must_use]
pub fn campaign_text(render: &CampaignRender, sort: SortMode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (campaign {})", render.title, render.campaign_id);
    let _ = writeln!(out, "Generated {}", render.generated_at);
    write_kpis(&mut out, &render.kpis);

    out.push('\n');
    let _ = writeln!(out, "{}", sort_hint(sort));
    let post_rows: Vec<Vec<String>> = render
        .posts
        .iter()
        .map(|p| {
            vec![
                format!("{} (@{})", p.creator_label, p.creator_handle),
                p.followers.clone(),
                p.views.clone(),
                p.likes.clone(),
                p.comments.clone(),
                status_cell(p),
                p.last_snapshot.clone(),
                p.post_url.clone(),
            ]
        })
        .collect();
    write_table(
        &mut out,
        &[
            "CREATOR", "FOLLOWERS", "VIEWS", "LIKES", "COMMENTS", "STATUS", "LAST SNAPSHOT",
            "URL",
        ],
        &post_rows,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let mut out = String::new();
        write_table(
            &mut out,
            &["A", "B"],
            &[
                vec!["long value".to_string(), "x".to_string()],
                vec!["s".to_string(), "y".to_string()],
            ],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "A           B");
        assert_eq!(lines[1], "long value  x");
        assert_eq!(lines[2], "s           y");
    }

    #[test]
    fn sort_hint_names_the_other_mode() {
        assert_eq!(
            sort_hint(SortMode::Desc),
            "Sorted by views (desc); use --sort asc to flip."
        );
    }
}
