//! Server-rendered HTML for the dashboard and campaign share pages.
//!
//! Output depends only on the rendered rows and sort mode, so the same input
//! always yields byte-identical markup.

use std::fmt::Write;

use crate::render::{CampaignRender, DashboardRender, KpiTile, PostRowView};
use crate::sort::SortMode;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem}\
table{border-collapse:collapse;width:100%}\
th,td{border-bottom:1px solid #ddd;padding:.4rem;text-align:left}\
.kpis{display:flex;gap:1rem}.kpi{border:1px solid #ddd;padding:.6rem 1rem}\
.status-ok{color:#1a7f37}.status-error{color:#cf222e}\
.status-pending,.status-scheduled{color:#9a6700}.status-unknown{color:#57606a}";

/// Escapes text for use in element content and quoted attribute values.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn open_page(out: &mut String, title: &str) {
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        escape(title)
    );
}

fn close_page(out: &mut String) {
    out.push_str("</body>\n</html>\n");
}

fn kpis(out: &mut String, tiles: &[KpiTile]) {
    out.push_str("<section class=\"kpis\">\n");
    for tile in tiles {
        let _ = writeln!(
            out,
            "<div class=\"kpi\"><span class=\"label\">{}</span> <strong>{}</strong></div>",
            escape(tile.label),
            escape(&tile.value)
        );
    }
    out.push_str("</section>\n");
}

fn sort_links(out: &mut String, base: &str, sort: SortMode) {
    let _ = writeln!(
        out,
        "<p class=\"sort\">Sorted by views ({current}). \
         <a href=\"{base}?sort={next}\">Sort {next}</a></p>",
        current = sort.as_str(),
        next = sort.toggled().as_str(),
    );
}

fn posts_table(out: &mut String, posts: &[PostRowView], with_campaign: bool) {
    let with_delete = posts.iter().any(|p| p.delete.is_some());
    out.push_str("<table class=\"posts\">\n<thead><tr><th>Creator</th>");
    if with_campaign {
        out.push_str("<th>Campaign</th>");
    }
    out.push_str(
        "<th>Followers</th><th>Post</th><th>Views</th><th>Likes</th>\
         <th>Comments</th><th>Status</th><th>Last snapshot</th>",
    );
    if with_delete {
        out.push_str("<th></th>");
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    for post in posts {
        let _ = write!(
            out,
            "<tr data-post-id=\"{}\"><td>{} <small>@{}</small></td>",
            post.post_id,
            escape(&post.creator_label),
            escape(&post.creator_handle)
        );
        if with_campaign {
            let _ = write!(
                out,
                "<td>{}</td>",
                escape(post.campaign_name.as_deref().unwrap_or_default())
            );
        }
        let _ = write!(
            out,
            "<td>{}</td><td><a href=\"{url}\" target=\"_blank\" rel=\"noopener\">{url}</a></td>\
             <td>{}</td><td>{}</td><td>{}</td>\
             <td class=\"{}\">{}</td><td>{}</td>",
            escape(&post.followers),
            escape(&post.views),
            escape(&post.likes),
            escape(&post.comments),
            post.status.css_class(),
            escape(&post.status.text),
            escape(&post.last_snapshot),
            url = escape(&post.post_url),
        );
        if with_delete {
            match &post.delete {
                Some(del) => {
                    let _ = write!(
                        out,
                        "<td><button class=\"delete-creator\" data-creator-id=\"{}\" \
                         data-creator-handle=\"{}\">Delete creator</button></td>",
                        del.creator_id,
                        escape(&del.creator_handle)
                    );
                }
                None => out.push_str("<td></td>"),
            }
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

#[must_use]
pub fn dashboard_page(render: &DashboardRender, sort: SortMode) -> String {
    let mut out = String::new();
    open_page(&mut out, "Reel engagement dashboard");
    out.push_str("<h1>Reel engagement dashboard</h1>\n");
    let _ = writeln!(
        out,
        "<p class=\"generated\">Updated {}</p>",
        escape(&render.generated_at)
    );
    kpis(&mut out, &render.kpis);

    out.push_str(
        "<h2>Campaigns</h2>\n<table class=\"campaigns\">\n<thead><tr><th>Campaign</th>\
         <th>Posts</th><th>Views</th><th>Likes</th><th>Comments</th></tr></thead>\n<tbody>\n",
    );
    for c in &render.campaigns {
        let _ = writeln!(
            out,
            "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&c.href),
            escape(&c.name),
            escape(&c.posts),
            escape(&c.views),
            escape(&c.likes),
            escape(&c.comments)
        );
    }
    out.push_str("</tbody>\n</table>\n<h2>Posts</h2>\n");
    sort_links(&mut out, "/", sort);
    posts_table(&mut out, &render.posts, true);
    close_page(&mut out);
    out
}

#[must_use]
pub fn campaign_page(render: &CampaignRender, sort: SortMode) -> String {
    let mut out = String::new();
    open_page(&mut out, &render.title);
    let _ = writeln!(out, "<h1>{}</h1>", escape(&render.title));
    let _ = writeln!(
        out,
        "<p class=\"generated\">Updated {}</p>",
        escape(&render.generated_at)
    );
    kpis(&mut out, &render.kpis);
    sort_links(&mut out, &format!("/campaign/{}", render.campaign_id), sort);
    posts_table(&mut out, &render.posts, false);
    close_page(&mut out);
    out
}
