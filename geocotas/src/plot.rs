//! Terminal and SVG plots of profiles and sections.

use anyhow::Result;
use cotas::{hatch::HatchKind, CrossSection, C};
use geo::geometry::Coord;
use plotters::prelude::*;
use std::path::Path;
use textplots::{Chart, Plot, Shape};

#[allow(clippy::cast_possible_truncation)]
fn points(line: &[Coord<C>]) -> Vec<(f32, f32)> {
    line.iter().map(|c| (c.x as f32, c.y as f32)).collect()
}

/// Returns the x range covered by all of `lines`.
fn x_range(lines: &[&[Coord<C>]]) -> (C, C) {
    lines
        .iter()
        .flat_map(|line| line.iter())
        .fold((C::INFINITY, C::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(c.x), hi.max(c.x))
        })
}

fn y_range(lines: &[&[Coord<C>]]) -> (C, C) {
    lines
        .iter()
        .flat_map(|line| line.iter())
        .fold((C::INFINITY, C::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(c.y), hi.max(c.y))
        })
}

/// Plots up to two `lines` to the terminal.
pub fn terminal(lines: &[&[Coord<C>]]) {
    let (lo, hi) = x_range(lines);
    if !(lo.is_finite() && hi.is_finite()) {
        return;
    }
    let data: Vec<Vec<(f32, f32)>> = lines.iter().map(|line| points(line)).collect();
    #[allow(clippy::cast_possible_truncation)]
    let (lo, hi) = (lo as f32, hi as f32);
    match data.as_slice() {
        [] => (),
        [only] => Chart::new(300, 150, lo, hi)
            .lineplot(&Shape::Lines(only))
            .display(),
        [first, second, ..] => Chart::new(300, 150, lo, hi)
            .lineplot(&Shape::Lines(first))
            .lineplot(&Shape::Lines(second))
            .display(),
    }
}

/// Draws `section` to an SVG file at `path`: terrain, design line,
/// and the cut and fill regions between them.
pub fn svg(path: &Path, section: &CrossSection) -> Result<()> {
    let lines = [section.terreno.as_slice(), section.corte.as_slice()];
    let (x_lo, x_hi) = x_range(&lines);
    let (y_lo, y_hi) = y_range(&lines);
    let pad = ((y_hi - y_lo) * 0.1).max(1.0);

    let root = SVGBackend::new(path, (1024, 512)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "aterro {:.3} m², corte {:.3} m²",
                section.areas.aterro, section.areas.corte
            ),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_lo..x_hi, (y_lo - pad)..(y_hi + pad))?;
    chart
        .configure_mesh()
        .x_desc("Distancia (m)")
        .y_desc("Cota (m)")
        .draw()?;

    for region in &section.areas.regions {
        let color = match region.kind {
            HatchKind::Aterro => BLUE,
            HatchKind::Corte => RED,
        };
        let outline: Vec<(C, C)> = region
            .polygon
            .exterior()
            .coords()
            .map(|c| (c.x, c.y))
            .collect();
        chart.draw_series(std::iter::once(Polygon::new(
            outline,
            color.mix(0.3).filled(),
        )))?;
    }

    chart
        .draw_series(LineSeries::new(
            section.terreno.iter().map(|c| (c.x, c.y)),
            &GREEN,
        ))?
        .label("Terreno")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));
    chart
        .draw_series(LineSeries::new(
            section.corte.iter().map(|c| (c.x, c.y)),
            &BLACK,
        ))?
        .label("Corte")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
