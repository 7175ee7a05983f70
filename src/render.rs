//! Presentation of a calculated chart: SVG diagram, text table or JSON.

use crate::chart::{self, HouseBasis, Layout, Placement, Point, EXTENT};
use crate::{ChartInfo, Result, Zodiac};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    #[default]
    Svg,
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub layout: Layout,
    pub basis: HouseBasis,
    /// Width and height of the drawing area in pixels.
    pub size: u32,
    pub title: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            layout: Layout::Diamond,
            basis: HouseBasis::Sign,
            size: 800,
            title: None,
        }
    }
}

const MARGIN: f64 = 40.0;
const TITLE_HEIGHT: f64 = 40.0;

pub fn chart_title(chart: &ChartInfo) -> String {
    let location = &chart.birth_info.location;
    format!(
        "Kundali {} UTC ({:.4}, {:.4})",
        chart.birth_info.date_time.format("%Y-%m-%d %H:%M"),
        location.latitude,
        location.longitude
    )
}

pub fn render(chart: &ChartInfo, format: Format, options: &RenderOptions) -> Result<String> {
    match format {
        Format::Svg => {
            let placement = chart::place(chart, options.layout, options.basis);
            let title = options.title.clone().unwrap_or_else(|| chart_title(chart));
            render_svg(&placement, options.size, &title)
        }
        Format::Table => render_table(chart),
        Format::Json => render_json(chart),
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Maps chart units (y up) to SVG pixels (y down).
struct Canvas {
    scale: f64,
}

impl Canvas {
    fn x(&self, p: Point) -> f64 {
        MARGIN + p.x * self.scale
    }

    fn y(&self, p: Point) -> f64 {
        TITLE_HEIGHT + MARGIN + (EXTENT - p.y) * self.scale
    }
}

pub fn render_svg(placement: &Placement, size: u32, title: &str) -> Result<String> {
    let size = f64::from(size.max(100));
    let canvas = Canvas {
        scale: size / EXTENT,
    };
    let width = size + 2.0 * MARGIN;
    let height = size + 2.0 * MARGIN + TITLE_HEIGHT;
    let label_font = (placement.layout.line_height() * canvas.scale * 0.8).round();
    let number_font = (label_font * 1.2).round();

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}" font-family="sans-serif">"#
    )?;
    writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"  <text x="{:.2}" y="{:.2}" font-size="20" text-anchor="middle">{}</text>"#,
        width / 2.0,
        TITLE_HEIGHT * 0.75,
        escape_xml(title)
    )?;

    if placement.layout == Layout::NorthIndian {
        writeln!(
            svg,
            r#"  <rect x="{MARGIN:.2}" y="{:.2}" width="{size:.2}" height="{size:.2}" fill="none" stroke="black" stroke-width="2"/>"#,
            TITLE_HEIGHT + MARGIN
        )?;
    }

    for placed in &placement.cells {
        let points: Vec<String> = placed
            .cell
            .outline
            .iter()
            .map(|&p| format!("{:.2},{:.2}", canvas.x(p), canvas.y(p)))
            .collect();
        writeln!(
            svg,
            r#"  <polygon points="{}" fill="none" stroke="black" stroke-width="1.5"/>"#,
            points.join(" ")
        )?;
    }

    for placed in &placement.cells {
        let house = placed.cell.house.number();
        let number = match placement.basis {
            HouseBasis::Sign => house.to_string(),
            HouseBasis::WholeSign => format!("{} · {}", house, placed.sign.number()),
        };
        let p = placed.number_position;
        writeln!(
            svg,
            r##"  <text x="{:.2}" y="{:.2}" font-size="{number_font}" fill="#888" text-anchor="middle" dominant-baseline="middle">{}</text>"##,
            canvas.x(p),
            canvas.y(p),
            escape_xml(&number)
        )?;

        for label in &placed.labels {
            writeln!(
                svg,
                r#"  <text x="{:.2}" y="{:.2}" font-size="{label_font}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
                canvas.x(label.position),
                canvas.y(label.position),
                escape_xml(&label.text)
            )?;
        }
    }

    writeln!(svg, "</svg>")?;
    Ok(svg)
}

pub fn render_table(chart: &ChartInfo) -> Result<String> {
    let mut out = String::new();
    let location = &chart.birth_info.location;
    writeln!(
        out,
        "Date/Time (UTC): {}",
        chart.birth_info.date_time.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(
        out,
        "Location: Latitude {:.4}, Longitude {:.4}",
        location.latitude, location.longitude
    )?;
    match chart.settings.zodiac {
        Zodiac::Tropical => writeln!(out, "Zodiac: tropical")?,
        Zodiac::Sidereal => writeln!(
            out,
            "Zodiac: sidereal ({} ayanamsa {:.4}°)",
            chart.ayanamsa.ayanamsa_name, chart.ayanamsa.ayanamsa_value
        )?,
    }
    writeln!(
        out,
        "Ascendant: {} {:.2}°",
        chart.ascendant.sign, chart.ascendant.degree
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "{:<8} {:>6}  {:<12} {:>8} {:>10}  {:<18} {:>4}  {:<5}",
        "Planet", "Sign #", "Sign", "Degree", "Longitude", "Nakshatra", "Pada", "Retro"
    )?;
    writeln!(out, "{}", "-".repeat(82))?;
    for p in &chart.planets {
        writeln!(
            out,
            "{:<8} {:>6}  {:<12} {:>7.2}° {:>9.2}°  {:<18} {:>4}  {:<5}",
            p.planet.name(),
            p.sign.number(),
            p.sign.to_string(),
            p.degree,
            p.longitude,
            p.nakshatra.nakshatra.to_string(),
            p.nakshatra.pada,
            if p.retrograde { "R" } else { "" }
        )?;
    }
    Ok(out)
}

pub fn render_json(chart: &ChartInfo) -> Result<String> {
    Ok(serde_json::to_string_pretty(chart)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BirthInfo, ChartSettings, Location};
    use chrono::{TimeZone, Utc};

    fn sample_chart() -> ChartInfo {
        let birth = BirthInfo::new(
            Utc.with_ymd_and_hms(2024, 7, 14, 12, 0, 0).unwrap(),
            Location::new(40.7128, -74.0060).unwrap(),
        );
        birth.generate_chart(ChartSettings::default()).unwrap()
    }

    #[test]
    fn svg_contains_cells_and_labels() {
        let chart = sample_chart();
        for layout in [Layout::Diamond, Layout::NorthIndian, Layout::Wheel] {
            let options = RenderOptions {
                layout,
                ..RenderOptions::default()
            };
            let svg = render(&chart, Format::Svg, &options).unwrap();
            assert!(svg.starts_with("<svg"));
            assert!(svg.trim_end().ends_with("</svg>"));
            assert_eq!(svg.matches("<polygon").count(), 12);
            for planet in &chart.planets {
                assert!(svg.contains(planet.planet.name()), "{layout:?}");
            }
            assert!(svg.contains("Kundali 2024-07-14 12:00 UTC"));
        }
    }

    #[test]
    fn svg_title_is_escaped() {
        let chart = sample_chart();
        let options = RenderOptions {
            title: Some("Tom & Jerry <born>".to_string()),
            ..RenderOptions::default()
        };
        let svg = render(&chart, Format::Svg, &options).unwrap();
        assert!(svg.contains("Tom &amp; Jerry &lt;born&gt;"));
        assert!(!svg.contains("<born>"));
    }

    #[test]
    fn whole_sign_cells_show_sign_numbers() {
        let chart = sample_chart();
        let options = RenderOptions {
            basis: HouseBasis::WholeSign,
            ..RenderOptions::default()
        };
        let svg = render(&chart, Format::Svg, &options).unwrap();
        let first = format!(">1 · {}<", chart.ascendant.sign.number());
        assert!(svg.contains(&first));
    }

    #[test]
    fn table_lists_every_planet() {
        let chart = sample_chart();
        let table = render(&chart, Format::Table, &RenderOptions::default()).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("Date/Time (UTC): 2024-07-14 12:00:00"));
        assert!(table.contains("Zodiac: tropical"));
        let header = lines.iter().position(|l| l.starts_with("Planet")).unwrap();
        assert_eq!(lines.len(), header + 2 + chart.planets.len());
        let sun = lines[header + 2];
        assert!(sun.starts_with("Sun"));
        assert!(sun.contains("Cancer"));
    }

    #[test]
    fn json_round_trips_through_serde() {
        let chart = sample_chart();
        let json = render(&chart, Format::Json, &RenderOptions::default()).unwrap();
        let parsed: ChartInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.planets.len(), chart.planets.len());
        assert_eq!(parsed.planets[0].sign, chart.planets[0].sign);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["planets"][0]["planet"], "Sun");
    }
}
