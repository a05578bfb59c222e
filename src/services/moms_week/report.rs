use std::fmt::Write;

use html_escape::encode_text;

use super::aggregate::{DaySummary, WeeklyReport};

const STYLE: &str = r#"
@page { size: A4; margin: 14mm 12mm; }
* { box-sizing: border-box; }
body { font-family: 'Helvetica Neue', Arial, sans-serif; color: #3d3d3d; margin: 0; }
header { text-align: center; border-bottom: 3px solid #f4a7b9; padding-bottom: 10px; margin-bottom: 16px; }
header h1 { color: #d46a8a; font-size: 26px; margin: 0 0 4px; }
header .range { color: #888; font-size: 13px; }
.totals { display: flex; justify-content: space-between; margin-bottom: 18px; }
.total { flex: 1; margin: 0 4px; background: #fdf0f4; border-radius: 10px; padding: 10px; text-align: center; }
.total .value { font-size: 22px; font-weight: bold; color: #d46a8a; }
.total .label { font-size: 11px; text-transform: uppercase; color: #999; }
.day { border: 1px solid #f1d4dd; border-radius: 10px; padding: 10px 14px; margin-bottom: 10px; page-break-inside: avoid; break-inside: avoid; }
.day h2 { font-size: 15px; margin: 0 0 6px; color: #a45a73; }
.day h2 .date { font-weight: normal; color: #aaa; font-size: 12px; margin-left: 6px; }
.day .counts { font-size: 12px; margin-bottom: 4px; }
.day.empty { background: #fafafa; border-style: dashed; color: #b5b5b5; }
.chip { display: inline-block; background: #fde4ec; color: #a45a73; border-radius: 10px; padding: 1px 8px; font-size: 11px; margin: 2px 3px 0 0; }
.tag { background: #e8f1fb; color: #4a7bb0; }
.note { font-size: 12px; font-style: italic; margin: 4px 0 0; }
.emotions { margin-top: 8px; }
footer { text-align: center; font-size: 10px; color: #bbb; margin-top: 16px; }
"#;

/// Builds the print-ready document for a week. Every day of the week gets a
/// card, Monday first; days without entries get a placeholder card.
pub fn render_html(report: &WeeklyReport, owner_name: &str) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let summary = &report.summary;

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>Diario semanal - Semana {week}</title>
<style>{STYLE}</style>
</head>
<body>
<header>
<h1>Diario semanal de {owner}</h1>
<div class="range">Semana {week} · {range}</div>
</header>
<section class="totals">
<div class="total"><div class="value">{photos}</div><div class="label">Fotos</div></div>
<div class="total"><div class="value">{words}</div><div class="label">Palabras</div></div>
<div class="total"><div class="value">{happy}</div><div class="label">Momentos felices</div></div>
<div class="total"><div class="value">{entries}</div><div class="label">Entradas</div></div>
</section>
"#,
        week = report.range.week,
        owner = encode_text(owner_name),
        range = report.date_range,
        photos = summary.total_photos,
        words = summary.total_words,
        happy = summary.total_happy_moments,
        entries = summary.total_entries,
    );

    for day in &report.days {
        render_day(&mut html, day);
    }

    if !summary.emotions.is_empty() {
        html.push_str(r#"<section class="emotions"><h2>Emociones de la semana</h2>"#);
        for (emotion, count) in &summary.emotions {
            let _ = write!(
                html,
                r#"<span class="chip">{} × {}</span>"#,
                encode_text(emotion),
                count
            );
        }
        html.push_str("</section>\n");
    }

    let _ = write!(
        html,
        "<footer>Generado el {}</footer>\n</body>\n</html>\n",
        chrono::Utc::now().format("%d/%m/%Y %H:%M UTC")
    );

    html
}

fn render_day(html: &mut String, day: &DaySummary) {
    let date = day.date.format("%d/%m/%Y");

    if day.is_empty() {
        let _ = write!(
            html,
            r#"<article class="day empty" data-date="{iso}">
<h2>{name}<span class="date">{date}</span></h2>
<p>Sin entradas este día</p>
</article>
"#,
            iso = day.date,
            name = day.day_name,
        );
        return;
    }

    let _ = write!(
        html,
        r#"<article class="day" data-date="{iso}">
<h2>{name}<span class="date">{date}</span></h2>
<div class="counts">📷 {photos} fotos · ✍️ {words} palabras · 😊 {happy} momentos felices</div>
"#,
        iso = day.date,
        name = day.day_name,
        photos = day.photos,
        words = day.words,
        happy = day.happy_moments,
    );

    if !day.emotions.is_empty() || !day.tags.is_empty() {
        html.push_str("<div>");
        for emotion in &day.emotions {
            let _ = write!(html, r#"<span class="chip">{}</span>"#, encode_text(emotion));
        }
        for tag in &day.tags {
            let _ = write!(html, r##"<span class="chip tag">#{}</span>"##, encode_text(tag));
        }
        html.push_str("</div>\n");
    }

    for note in &day.notes {
        let _ = writeln!(html, r#"<p class="note">{}</p>"#, encode_text(note));
    }

    html.push_str("</article>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::moms_week::aggregate::{aggregate_week, tests::entry};
    use crate::services::moms_week::week::WeekRange;
    use chrono::{Duration, NaiveDate};

    fn range() -> WeekRange {
        WeekRange::containing(NaiveDate::from_ymd_opt(2026, 2, 11).unwrap())
    }

    #[test]
    fn test_all_seven_days_in_order_even_without_entries() {
        let range = range();
        let html = render_html(&aggregate_week(&range, &[]), "Ana");

        let positions: Vec<usize> = range
            .days()
            .map(|d| {
                html.find(&format!(r#"data-date="{}""#, d))
                    .unwrap_or_else(|| panic!("missing day {}", d))
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(html.matches("Sin entradas este día").count(), 7);
    }

    #[test]
    fn test_days_with_entries_have_no_placeholder() {
        let range = range();
        let entries = vec![entry(range.start + Duration::days(2), 3, 40, 1)];
        let html = render_html(&aggregate_week(&range, &entries), "Ana");

        assert_eq!(html.matches("Sin entradas este día").count(), 6);
        assert!(html.contains("Miércoles"));
        assert!(html.contains("3 fotos"));
    }

    #[test]
    fn test_user_content_is_escaped() {
        let range = range();
        let mut e = entry(range.start, 1, 1, 1);
        e.note = Some("<script>alert(1)</script>".into());
        e.tags = Some(r#"["<b>"]"#.into());
        let html = render_html(&aggregate_week(&range, &[e]), "Ana & <Leo>");

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Ana &amp; &lt;Leo&gt;"));
        assert!(!html.contains("#<b>"));
    }

    #[test]
    fn test_header_carries_week_and_range() {
        let range = range();
        let html = render_html(&aggregate_week(&range, &[]), "Ana");
        assert!(html.contains("Semana 7"));
        assert!(html.contains("09/02/2026 - 15/02/2026"));
    }
}
