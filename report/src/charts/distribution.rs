use crate::charts::{
    self, draw_boxes, series_color, BoxSpec, AXIS_LABEL_FONT_SIZE, LEGEND_FONT_SIZE,
    TICK_LABEL_FONT_SIZE, TITLE_FONT_SIZE,
};
use anyhow::Result;
use benchviz_analysis::{
    group::{self, metric},
    stats::{Quartiles, Summary},
};
use benchviz_ingest::Table;
use itertools::Itertools;
use plotters::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Grouped box plots of average execution time by query type and engine,
/// log-scaled y axis. Values at or below zero are clamped to a tenth of the
/// smallest positive value so the scale stays defined.
pub fn render(table: &Table, images: &Path) -> Result<()> {
    let query_types = table.query_types();
    let engine_types = table.engine_types();
    let groups = group::by_engine_and_query(table, metric::avg_execution_time);

    let positive_floor = groups
        .values()
        .flatten()
        .copied()
        .filter(|value| *value > 0.0)
        .fold(f64::INFINITY, f64::min);

    if query_types.is_empty() || !positive_floor.is_finite() {
        warn!("no positive execution times, skipping distribution chart");
        return Ok(());
    }

    let epsilon = positive_floor * 0.1;
    let max_time = groups
        .values()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max)
        .max(epsilon)
        * 2.0;

    let path = images.join("execution_time_distribution.png");
    let root = BitMapBackend::new(&path, (1500, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Execution Time Distribution by Query Type and Engine (log scale)",
            ("sans-serif", TITLE_FONT_SIZE),
        )
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(90)
        .build_cartesian_2d(
            -0.5..query_types.len() as f64 - 0.5,
            (epsilon * 0.5..max_time).log_scale(),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(query_types.len())
        .x_label_formatter(&|x| charts::category_label(&query_types, *x))
        .y_desc("Average Execution Time (ms)")
        .x_desc("Query Type")
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    let box_width = 0.8 / engine_types.len() as f64;
    let mut boxes = Vec::new();

    for (query_index, query_type) in query_types.iter().enumerate() {
        for (engine_index, engine_type) in engine_types.iter().enumerate() {
            let Some(values) = groups.get(&(engine_type.clone(), query_type.clone())) else {
                continue;
            };

            let clamped = values.iter().map(|value| value.max(epsilon)).collect_vec();
            let Some(quartiles) = Quartiles::of(&clamped) else {
                continue;
            };

            boxes.push(BoxSpec {
                x_center: query_index as f64
                    + charts::group_offset(engine_index, engine_types.len(), 0.8),
                width: box_width * 0.9,
                color: series_color(engine_index),
                quartiles,
            });
        }
    }

    draw_boxes(&mut chart, &boxes)?;

    for (index, engine_type) in engine_types.iter().enumerate() {
        let color = series_color(index);

        chart
            .draw_series(std::iter::once(Circle::new((0.0, epsilon), 0, color.filled())))?
            .label(engine_type)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()?;

    root.present()?;
    info!("generated {}", path.display());

    for ((engine_type, query_type), values) in &groups {
        if let Some(summary) = Summary::of(values) {
            debug!(
                engine = %engine_type,
                query = %query_type,
                count = summary.count,
                mean = summary.mean,
                std = summary.std,
                min = summary.min,
                max = summary.max,
                "execution time summary"
            );
        }
    }

    Ok(())
}
