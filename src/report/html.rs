//! HTML page rendering with inline SVG charts

use crate::dashboard::{Content, HeadingLevel, Page, Section};
use crate::data::Preview;
use log::warn;
use std::io::{self, Write};

/// Favicon: the page icon drawn as SVG text
const FAVICON: &str = "data:image/svg+xml,%3Csvg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22%3E%3Ctext y=%22.9em%22 font-size=%2290%22%3E%F0%9F%94%AC%3C/text%3E%3C/svg%3E";

pub fn write<W: Write>(writer: &mut W, page: &Page) -> io::Result<()> {
    write!(writer, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="icon" href="{favicon}">
    <style>
        :root {{
            --bg: #ffffff;
            --card: #f8f9fb;
            --border: #e1e4e8;
            --text: #262730;
            --dim: #6b6f76;
            --accent: #ff4b4b;
            --error: #b42318;
            --notice: #b54708;
        }}
        * {{ box-sizing: border-box; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.6;
            margin: 0;
        }}
        .container {{ max-width: 760px; margin: 0 auto; padding: 3rem 1rem; }}
        h1 {{ font-size: 2.4rem; margin: 0 0 1rem 0; }}
        h2 {{ font-size: 1.8rem; margin: 2.5rem 0 0.5rem 0; }}
        h3 {{ font-size: 1.4rem; margin: 2rem 0 0.5rem 0; }}
        .caption {{ color: var(--dim); font-size: 0.95rem; }}

        /* Selectors */
        .selector {{ display: flex; flex-direction: column; margin: 0.75rem 0; }}
        .selector label {{ font-size: 0.875rem; margin-bottom: 0.25rem; }}
        .selector select {{
            padding: 0.5rem;
            border: 1px solid var(--border);
            border-radius: 8px;
            background: var(--card);
            font-size: 1rem;
        }}

        /* Charts */
        .chart {{ margin: 1rem 0; }}
        .chart svg {{ max-width: 100%; height: auto; }}

        /* Example data */
        .table-container {{
            border: 1px solid var(--border);
            border-radius: 8px;
            overflow-x: auto;
        }}
        table {{ border-collapse: collapse; font-size: 0.85rem; width: 100%; }}
        th, td {{ padding: 0.4rem 0.75rem; text-align: right; white-space: nowrap; border-bottom: 1px solid var(--border); }}
        th {{ background: var(--card); font-weight: 600; }}
        td.index, th.index {{ text-align: left; }}
        td.missing {{ color: var(--dim); }}

        .error, .notice {{
            border-radius: 8px;
            padding: 0.75rem 1rem;
            margin: 1rem 0;
        }}
        .error {{ background: #fef3f2; color: var(--error); }}
        .notice {{ background: #fffaeb; color: var(--notice); }}
        footer {{ color: var(--dim); font-size: 0.8rem; margin-top: 3rem; }}
    </style>
</head>
<body>
<div class="container">
<form id="selection" method="get" action="/"></form>
"#,
        title = escape(page.title),
        favicon = FAVICON,
    )?;

    for section in &page.sections {
        write_section(writer, section)?;
    }

    write!(writer, r#"<noscript><button type="submit" form="selection">Apply</button></noscript>
<footer>Generated {generated}</footer>
</div>
<script>
(function () {{
    // Re-render only the section owning a selector; a file:// copy stays static.
    if (!location.protocol.startsWith('http')) return;
    const form = document.getElementById('selection');
    function bind() {{
        document.querySelectorAll('select[form="selection"]:not([data-bound])').forEach(function (select) {{
            select.dataset.bound = '1';
            select.addEventListener('change', function () {{
                const query = new URLSearchParams(new FormData(form)).toString();
                const id = select.dataset.section;
                history.replaceState(null, '', '/?' + query);
                fetch('/section/' + id + '?' + query)
                    .then(function (r) {{ if (!r.ok) throw new Error(r.status); return r.text(); }})
                    .then(function (html) {{
                        document.getElementById('section-' + id).outerHTML = html;
                        bind();
                    }})
                    .catch(function () {{ form.submit(); }});
            }});
        }});
    }}
    bind();
}})();
</script>
</body>
</html>
"#,
        generated = escape(&page.generated),
    )?;

    Ok(())
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One section as a standalone fragment, as swapped in on selector change.
///
/// A grouped section puts its selectors under the group header, ahead of
/// the heading they control.
pub fn write_section<W: Write>(writer: &mut W, section: &Section) -> io::Result<()> {
    let slug = section.id.slug();
    writeln!(writer, r#"<section id="section-{}" data-section="{}">"#, slug, slug)?;

    if let Some(group) = section.group {
        writeln!(writer, "<h2>{}</h2>", escape(group))?;
        write_notices(writer, section)?;
        write_selectors(writer, section)?;
        write_heading(writer, section)?;
    } else {
        write_heading(writer, section)?;
        write_notices(writer, section)?;
        write_selectors(writer, section)?;
    }

    match &section.content {
        Content::None => {}
        Content::Chart(chart) => match chart.to_svg() {
            Ok(svg) => writeln!(writer, r#"<div class="chart">{}</div>"#, svg)?,
            Err(e) => {
                warn!("section {}: {}", slug, e);
                write_error(writer, &e.to_string())?;
            }
        },
        Content::Table(preview) => write_preview(writer, preview)?,
        Content::Error(message) => write_error(writer, message)?,
    }

    if let Some(caption) = &section.caption {
        writeln!(writer, r#"<p class="caption">{}</p>"#, escape(caption))?;
    }

    writeln!(writer, "</section>")
}

fn write_heading<W: Write>(writer: &mut W, section: &Section) -> io::Result<()> {
    let tag = match section.level {
        HeadingLevel::Title => "h1",
        HeadingLevel::Header => "h2",
        HeadingLevel::Subheader => "h3",
    };
    writeln!(writer, "<{tag}>{}</{tag}>", escape(&section.heading), tag = tag)?;
    if let Some(text) = &section.text {
        writeln!(writer, "<p>{}</p>", escape(text))?;
    }
    Ok(())
}

fn write_notices<W: Write>(writer: &mut W, section: &Section) -> io::Result<()> {
    for notice in &section.notices {
        writeln!(writer, r#"<div class="notice">{}</div>"#, escape(notice))?;
    }
    Ok(())
}

fn write_error<W: Write>(writer: &mut W, message: &str) -> io::Result<()> {
    writeln!(
        writer,
        r#"<div class="error">Could not render this section: {}</div>"#,
        escape(message)
    )
}

fn write_selectors<W: Write>(writer: &mut W, section: &Section) -> io::Result<()> {
    let slug = section.id.slug();
    for selector in &section.selectors {
        let input_id = format!("{}-{}", slug, selector.key);
        writeln!(writer, r#"<div class="selector">"#)?;
        writeln!(writer, r#"<label for="{}">{}</label>"#, input_id, escape(selector.label))?;
        writeln!(
            writer,
            r#"<select id="{}" name="{}" form="selection" data-section="{}">"#,
            input_id, selector.key, slug
        )?;
        for option in &selector.options {
            let selected = if *option == selector.selected { " selected" } else { "" };
            writeln!(
                writer,
                r#"<option value="{v}"{s}>{v}</option>"#,
                v = escape(option),
                s = selected
            )?;
        }
        writeln!(writer, "</select>\n</div>")?;
    }
    Ok(())
}

fn write_preview<W: Write>(writer: &mut W, preview: &Preview) -> io::Result<()> {
    writeln!(writer, r#"<div class="table-container"><table>"#)?;
    write!(writer, r#"<thead><tr><th class="index">{}</th>"#, escape(&preview.index_name))?;
    for column in &preview.columns {
        write!(writer, "<th>{}</th>", escape(column))?;
    }
    writeln!(writer, "</tr></thead>")?;

    writeln!(writer, "<tbody>")?;
    for row in &preview.rows {
        write!(writer, r#"<tr><td class="index">{}</td>"#, escape(&row.id))?;
        for value in &row.values {
            if value.is_missing() {
                write!(writer, r#"<td class="missing">{}</td>"#, value)?;
            } else {
                write!(writer, "<td>{}</td>", escape(&value.to_string()))?;
            }
        }
        writeln!(writer, "</tr>")?;
    }
    writeln!(writer, "</tbody>\n</table></div>")
}
