use crate::charts::{
    self, draw_boxes, series_color, BoxSpec, AXIS_LABEL_FONT_SIZE, LEGEND_FONT_SIZE,
    TICK_LABEL_FONT_SIZE, TITLE_FONT_SIZE,
};
use crate::config::ImpactConfig;
use anyhow::Result;
use benchviz_analysis::{
    group::{self, metric},
    improvement,
    stats::Quartiles,
};
use benchviz_ingest::Table;
use itertools::Itertools;
use plotters::{coord::Shift, prelude::*};
use std::path::Path;
use tracing::{info, warn};

const SELECT_PAIR: [&str; 2] = ["RANGE_SELECT", "EQUALS_SELECT"];
const UPDATE_PAIR: [&str; 2] = ["RANGE_UPDATE", "EQUALS_UPDATE"];

/// range vs. equals box plots for SELECT and UPDATE operations,
/// one panel each; a panel without matching rows is left blank
pub fn render_range_vs_equals(table: &Table, images: &Path) -> Result<()> {
    let panels = [
        ("SELECT Operations: Range vs Equals", SELECT_PAIR),
        ("UPDATE Operations: Range vs Equals", UPDATE_PAIR),
    ];
    let query_types = table.query_types();
    let has_any = panels
        .iter()
        .any(|(_, pair)| pair.iter().any(|wanted| query_types.iter().any(|q| q == wanted)));

    if !has_any {
        info!("no range/equals query types in the data, skipping comparison chart");
        return Ok(());
    }

    let path = images.join("range_vs_equals_comparison.png");
    let root = BitMapBackend::new(&path, (1600, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let cells = root.split_evenly((1, 2));

    for ((title, pair), cell) in panels.iter().zip(cells.iter()) {
        draw_pair_panel(cell, table, title, pair)?;
    }

    root.present()?;
    info!("generated {}", path.display());

    Ok(())
}

fn draw_pair_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    table: &Table,
    title: &str,
    pair: &[&str; 2],
) -> Result<()> {
    let engine_types = table.engine_types();
    let groups = group::by_engine_and_query(table, metric::avg_execution_time);

    let panel_values = engine_types
        .iter()
        .cartesian_product(pair.iter())
        .filter_map(|(engine_type, query_type)| {
            groups.get(&(engine_type.clone(), query_type.to_string()))
        })
        .flatten()
        .copied()
        .collect_vec();

    let positive_floor = panel_values
        .iter()
        .copied()
        .filter(|value| *value > 0.0)
        .fold(f64::INFINITY, f64::min);

    if panel_values.is_empty() || !positive_floor.is_finite() {
        info!(panel = title, "no matching rows, leaving panel blank");
        return Ok(());
    }

    let epsilon = positive_floor * 0.1;
    let max_time = panel_values.iter().copied().fold(0.0_f64, f64::max) * 2.0;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", TITLE_FONT_SIZE - 4))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(
            -0.5..engine_types.len() as f64 - 0.5,
            (epsilon * 0.5..max_time).log_scale(),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(engine_types.len())
        .x_label_formatter(&|x| charts::category_label(&engine_types, *x))
        .y_desc("Average Execution Time (ms)")
        .x_desc("Engine Configuration")
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    let mut boxes = Vec::new();

    for (engine_index, engine_type) in engine_types.iter().enumerate() {
        for (pair_index, query_type) in pair.iter().enumerate() {
            let Some(values) = groups.get(&(engine_type.clone(), query_type.to_string())) else {
                continue;
            };

            let clamped = values.iter().map(|value| value.max(epsilon)).collect_vec();
            let Some(quartiles) = Quartiles::of(&clamped) else {
                continue;
            };

            boxes.push(BoxSpec {
                x_center: engine_index as f64 + charts::group_offset(pair_index, 2, 0.7),
                width: 0.3,
                color: series_color(pair_index),
                quartiles,
            });
        }
    }

    draw_boxes(&mut chart, &boxes)?;

    for (index, query_type) in pair.iter().enumerate() {
        let color = series_color(index);

        chart
            .draw_series(std::iter::once(Circle::new((0.0, epsilon), 0, color.filled())))?
            .label(*query_type)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled()));
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

/// improvement percentage of the variant configuration over the baseline,
/// one bar per query type with a zero reference line
pub fn render_configuration_impact(
    table: &Table,
    images: &Path,
    config: &ImpactConfig,
) -> Result<()> {
    let improvements = improvement::configuration_impact(table, &config.baseline, &config.variant);

    if improvements.is_empty() {
        warn!(
            baseline = %config.baseline,
            variant = %config.variant,
            "no overlapping configuration data, skipping impact chart"
        );
        return Ok(());
    }

    let categories = improvements
        .iter()
        .map(|improvement| improvement.query_type.clone())
        .collect_vec();
    let max_percent = improvements
        .iter()
        .map(|improvement| improvement.percent)
        .fold(0.0_f64, f64::max)
        .max(0.0);
    let min_percent = improvements
        .iter()
        .map(|improvement| improvement.percent)
        .fold(0.0_f64, f64::min)
        .min(0.0);
    let span = (max_percent - min_percent).max(1.0);
    let y_max = max_percent + span * 0.2;
    let y_min = min_percent - span * 0.2;

    let path = images.join("configuration_impact.png");
    let root = BitMapBackend::new(&path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Performance Impact of '{}' over '{}'",
                config.variant, config.baseline
            ),
            ("sans-serif", TITLE_FONT_SIZE),
        )
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5..improvements.len() as f64 - 0.5, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(improvements.len())
        .x_label_formatter(&|x| charts::category_label(&categories, *x))
        .y_desc("Performance Improvement (%)")
        .x_desc("Query Type")
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    // zero reference line
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(-0.5, 0.0), (improvements.len() as f64 - 0.5, 0.0)],
        BLACK.mix(0.4).stroke_width(1),
    )))?;

    for (index, improvement) in improvements.iter().enumerate() {
        let x_center = index as f64;
        let percent = improvement.percent;
        let above = percent >= 0.0;
        let label_offset = span * 0.02;

        chart.draw_series(std::iter::once(Rectangle::new(
            [(x_center - 0.3, 0.0), (x_center + 0.3, percent)],
            series_color(0).filled(),
        )))?;
        chart.draw_series(std::iter::once(charts::value_label(
            (
                x_center,
                if above {
                    percent + label_offset
                } else {
                    percent - label_offset
                },
            ),
            format!("{percent:.1}%"),
            above,
        )))?;
    }

    root.present()?;
    info!("generated {}", path.display());

    Ok(())
}
