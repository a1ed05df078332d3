use crate::charts::{
    self, series_color, AXIS_LABEL_FONT_SIZE, LEGEND_FONT_SIZE, TICK_LABEL_FONT_SIZE,
    TITLE_FONT_SIZE,
};
use anyhow::Result;
use benchviz_analysis::{
    group::{self, metric},
    stats::rolling_mean,
};
use benchviz_ingest::Table;
use itertools::Itertools;
use plotters::{coord::Shift, prelude::*};
use std::path::Path;
use tracing::{info, warn};

const GRID_COLUMNS: usize = 2;
const SUBPLOT_HEIGHT: u32 = 420;
const GRID_WIDTH: u32 = 1500;

/// execution time vs. query count, one subplot per query type,
/// one line per engine type
pub fn render_query_time(table: &Table, images: &Path) -> Result<()> {
    let query_types = table.query_types();

    if query_types.is_empty() {
        warn!("no rows, skipping query time trends");
        return Ok(());
    }

    let engine_types = table.engine_types();
    let rows = charts::grid_rows(query_types.len(), GRID_COLUMNS);

    let path = images.join("query_time_trends_overview.png");
    let root = BitMapBackend::new(&path, (GRID_WIDTH, rows as u32 * SUBPLOT_HEIGHT))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let cells = root.split_evenly((rows, GRID_COLUMNS));

    // unused trailing cells stay blank
    for (index, query_type) in query_types.iter().enumerate() {
        let series = group::series_by_engine(table, query_type, metric::avg_execution_time);

        draw_trend_panel(
            &cells[index],
            &format!("{query_type} Performance Trends"),
            "Average Execution Time (ms)",
            &engine_types,
            &series.into_iter().collect_vec(),
            false,
        )?;
    }

    root.present()?;
    info!("generated {}", path.display());

    Ok(())
}

/// Rolling mean of the heap memory delta per operation (MB) vs. query count,
/// one subplot per query type. Skipped when no file carried the heap columns.
pub fn render_memory(table: &Table, images: &Path, window: usize) -> Result<()> {
    if !table.has_heap_data() {
        info!("no heap columns in the loaded files, skipping memory trend");
        return Ok(());
    }

    let query_types = table.query_types();
    let engine_types = table.engine_types();
    let rows = charts::grid_rows(query_types.len(), GRID_COLUMNS);

    let path = images.join("memory_usage_over_time.png");
    let root = BitMapBackend::new(&path, (GRID_WIDTH, rows as u32 * SUBPLOT_HEIGHT))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let cells = root.split_evenly((rows, GRID_COLUMNS));

    for (index, query_type) in query_types.iter().enumerate() {
        let series = group::series_by_engine(table, query_type, metric::heap_memory_delta)
            .into_iter()
            .map(|(engine_type, points)| {
                let counts = points.iter().map(|(count, _)| *count).collect_vec();
                let deltas_mb = points.iter().map(|(_, bytes)| bytes / 1e6).collect_vec();
                let smoothed = rolling_mean(&deltas_mb, window);

                (engine_type, counts.into_iter().zip(smoothed).collect_vec())
            })
            .collect_vec();

        draw_trend_panel(
            &cells[index],
            &format!("Memory Impact - {query_type}"),
            "Memory Change per Operation (MB)",
            &engine_types,
            &series,
            true,
        )?;
    }

    root.present()?;
    info!("generated {}", path.display());

    Ok(())
}

fn draw_trend_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    y_desc: &str,
    engine_types: &[String],
    series: &[(String, Vec<(f64, f64)>)],
    zero_baseline: bool,
) -> Result<()> {
    let points = series.iter().flat_map(|(_, points)| points);
    let x_max = points
        .clone()
        .map(|(count, _)| *count)
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.05;
    let mut y_min = points.clone().map(|(_, value)| *value).fold(f64::INFINITY, f64::min);
    let mut y_max = points.map(|(_, value)| *value).fold(f64::NEG_INFINITY, f64::max);

    if !y_min.is_finite() || !y_max.is_finite() {
        // no data for this query type, leave the cell blank
        return Ok(());
    }

    if zero_baseline {
        y_min = y_min.min(0.0);
        y_max = y_max.max(0.0);
    } else {
        y_min = y_min.min(0.0);
    }
    let padding = ((y_max - y_min) * 0.1).max(1e-6);
    y_min -= padding;
    y_max += padding;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", TITLE_FONT_SIZE - 6))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Number of Queries")
        .y_desc(y_desc)
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    if zero_baseline {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 0.0), (x_max, 0.0)],
            BLACK.mix(0.4).stroke_width(1),
        )))?;
    }

    for (engine_type, points) in series {
        if points.is_empty() {
            continue;
        }

        let color_index = engine_types
            .iter()
            .position(|known| known == engine_type)
            .unwrap_or(0);
        let color = series_color(color_index);

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(engine_type)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, color.mix(0.6).filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()?;

    Ok(())
}
