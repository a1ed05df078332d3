use crate::charts::{
    self, series_color, AXIS_LABEL_FONT_SIZE, LEGEND_FONT_SIZE, TICK_LABEL_FONT_SIZE,
    TITLE_FONT_SIZE,
};
use anyhow::Result;
use benchviz_analysis::group::{self, metric};
use benchviz_ingest::Table;
use plotters::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// grouped bars of mean success rate by engine type and query type,
/// with a value label on every bar
pub fn render(table: &Table, images: &Path) -> Result<()> {
    let engine_types = table.engine_types();
    let query_types = table.query_types();
    let pivot = group::mean_pivot(table, metric::success_rate);

    if engine_types.is_empty() {
        warn!("no rows, skipping success rate chart");
        return Ok(());
    }

    let max_rate = pivot
        .values()
        .flat_map(|row| row.values())
        .copied()
        .fold(0.0_f64, f64::max);
    let y_max = (max_rate * 1.2).max(1.0);

    let path = images.join("success_rates.png");
    let root = BitMapBackend::new(&path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Success Rates by Engine and Query Type",
            ("sans-serif", TITLE_FONT_SIZE),
        )
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5..engine_types.len() as f64 - 0.5, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(engine_types.len())
        .x_label_formatter(&|x| charts::category_label(&engine_types, *x))
        .y_desc("Success Rate (%)")
        .x_desc("Engine Configuration")
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    let bar_width = 0.8 / query_types.len() as f64;

    for (engine_index, engine_type) in engine_types.iter().enumerate() {
        for (query_index, query_type) in query_types.iter().enumerate() {
            let Some(rate) = pivot
                .get(engine_type)
                .and_then(|row| row.get(query_type))
                .copied()
            else {
                continue;
            };

            let x_center = engine_index as f64
                + charts::group_offset(query_index, query_types.len(), 0.8);
            let half = bar_width * 0.45;

            chart.draw_series(std::iter::once(Rectangle::new(
                [(x_center - half, 0.0), (x_center + half, rate)],
                series_color(query_index).filled(),
            )))?;
            chart.draw_series(std::iter::once(charts::value_label(
                (x_center, rate + y_max * 0.01),
                format!("{rate:.1}%"),
                true,
            )))?;
        }
    }

    for (index, query_type) in query_types.iter().enumerate() {
        let color = series_color(index);

        chart
            .draw_series(std::iter::once(Circle::new((0.0, 0.0), 0, color.filled())))?
            .label(query_type)
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

    Ok(())
}
