use std::fmt::Write;

use dashboard_core::{
    accessibility_text, DetailView, LinkKind, Notice, NoticeKind, StatusCodeClass, SyncView,
};

const URL_WIDTH: usize = 48;
const TITLE_WIDTH: usize = 32;

pub fn results(view: &SyncView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<8}  {:<URL_WIDTH$}  {}",
        "ID", "STATUS", "URL", "TITLE"
    );
    for item in view.items() {
        let title = item.crawl_data.title.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "{:>6}  {:<8}  {:<URL_WIDTH$}  {}",
            item.id,
            item.status().as_str(),
            clip(&item.url, URL_WIDTH),
            clip(title, TITLE_WIDTH)
        );
    }
    if view.items().is_empty() {
        let _ = writeln!(out, "(no results)");
    }

    let page = &view.page;
    let _ = writeln!(
        out,
        "page {} of {} ({} total)",
        page.page,
        page.total_pages.max(1),
        page.total
    );
    let counts: Vec<String> = view
        .status_counts()
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(status, count)| format!("{status}: {count}"))
        .collect();
    if !counts.is_empty() {
        let _ = writeln!(out, "{}", counts.join("  "));
    }
    if view.is_polling {
        let _ = writeln!(out, "polling for updates...");
    }
    if let Some(error) = &view.last_error {
        let _ = writeln!(out, "error: {error}");
    }
    out
}

pub fn notice(notice: &Notice) -> String {
    match notice.kind {
        NoticeKind::Success => format!("ok: {}", notice.text),
        NoticeKind::Failure => format!("failed: {}", notice.text),
    }
}

pub fn details(view: &DetailView) -> String {
    let mut out = String::new();
    if let Some(meta) = &view.meta {
        let data = &meta.crawl_data;
        let _ = writeln!(out, "#{} {}", meta.id, meta.url);
        let _ = writeln!(out, "  status:        {}", data.status);
        let _ = writeln!(out, "  title:         {}", data.title.as_deref().unwrap_or("-"));
        let _ = writeln!(
            out,
            "  html version:  {}",
            data.html_version.as_deref().unwrap_or("-")
        );
        let _ = writeln!(
            out,
            "  links:         {} internal, {} external, {} inaccessible",
            data.internal_links, data.external_links, data.inaccessible_links
        );
        let _ = writeln!(
            out,
            "  login form:    {}",
            if data.has_login_form { "yes" } else { "no" }
        );
    } else if let Some(id) = view.target_id {
        let _ = writeln!(out, "#{id}");
    }

    let _ = writeln!(out, "\nheadings ({})", view.headings.len());
    for heading in &view.headings {
        let _ = writeln!(out, "  {:<3} {}", heading.level, heading.text);
    }

    let _ = writeln!(out, "\nlinks ({})", view.links.len());
    for link in &view.links {
        let code = match link.status_code {
            Some(code) => code.to_string(),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "  {:<8} {:>3} {:<7} accessible: {:<3} {}",
            match link.kind {
                LinkKind::Internal => "internal",
                LinkKind::External => "external",
            },
            code,
            status_label(link.status_code),
            accessibility_text(link.is_accessible),
            link.url
        );
    }

    if let Some(diagnostic) = &view.diagnostic {
        let _ = writeln!(out, "\nwarning: {diagnostic}");
    }
    out
}

fn status_label(status_code: Option<u16>) -> &'static str {
    match StatusCodeClass::classify(status_code) {
        StatusCodeClass::Success => "ok",
        StatusCodeClass::Error => "broken",
        StatusCodeClass::Unknown => "unknown",
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}
