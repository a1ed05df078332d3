use crate::charts::{
    self, series_color, AXIS_LABEL_FONT_SIZE, DATA_LABEL_FONT_SIZE, TICK_LABEL_FONT_SIZE,
    TITLE_FONT_SIZE,
};
use anyhow::Result;
use benchviz_analysis::group::{self, metric};
use benchviz_ingest::Table;
use itertools::Itertools;
use plotters::{coord::Shift, element::Pie, prelude::*};
use std::path::Path;
use tracing::{info, warn};

/// Performance comparison overview: a 2x2 grid with mean execution time,
/// total execution time, the query type mix, and mean heap usage. The first
/// three panels are also written as standalone charts.
pub fn render(table: &Table, images: &Path) -> Result<()> {
    let avg = group::mean_by_engine_type(table, metric::avg_execution_time)
        .into_iter()
        .collect_vec();
    let total = group::sum_by_engine_type(table, metric::total_execution_time)
        .into_iter()
        .collect_vec();
    let heap = group::mean_by_engine_type(table, metric::heap_memory_used)
        .into_iter()
        .map(|(engine_type, bytes)| (engine_type, bytes / 1e6))
        .collect_vec();
    let shares = group::max_count_by_query(table)
        .into_iter()
        .map(|(query_type, count)| (query_type, count as f64))
        .collect_vec();

    if avg.is_empty() {
        warn!("no rows, skipping performance comparison");
        return Ok(());
    }

    let path = images.join("performance_comparison_overview.png");
    let root = BitMapBackend::new(&path, (1600, 1200)).into_drawing_area();
    root.fill(&WHITE)?;

    let cells = root.split_evenly((2, 2));
    draw_engine_bar(
        &cells[0],
        "Average Execution Time by Engine",
        "Time (ms)",
        &avg,
        &|value| format!("{value:.2}"),
    )?;
    draw_engine_bar(
        &cells[1],
        "Total Execution Time by Engine",
        "Total Time (ms)",
        &total,
        &|value| format!("{value:.0}"),
    )?;
    draw_pie(&cells[2], "Query Type Distribution", &shares)?;
    if heap.is_empty() {
        info!("no heap data, leaving the memory panel of the overview empty");
    } else {
        draw_engine_bar(
            &cells[3],
            "Average Heap Memory by Engine",
            "Heap Used (MB)",
            &heap,
            &|value| format!("{value:.1}"),
        )?;
    }

    root.present()?;
    info!("generated {}", path.display());

    render_single_bar(
        images,
        "avg_execution_time_by_engine.png",
        "Average Execution Time by Engine",
        "Time (ms)",
        &avg,
        &|value| format!("{value:.2}"),
    )?;
    render_single_bar(
        images,
        "total_execution_time_by_engine.png",
        "Total Execution Time by Engine",
        "Total Time (ms)",
        &total,
        &|value| format!("{value:.0}"),
    )?;

    let path = images.join("query_type_distribution.png");
    let root = BitMapBackend::new(&path, (900, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    draw_pie(&root, "Query Type Distribution", &shares)?;
    root.present()?;
    info!("generated {}", path.display());

    Ok(())
}

fn render_single_bar(
    images: &Path,
    file: &str,
    title: &str,
    y_desc: &str,
    data: &[(String, f64)],
    format: &dyn Fn(f64) -> String,
) -> Result<()> {
    let path = images.join(file);
    let root = BitMapBackend::new(&path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    draw_engine_bar(&root, title, y_desc, data, format)?;

    root.present()?;
    info!("generated {}", path.display());

    Ok(())
}

/// one bar per engine type with a value label on top
fn draw_engine_bar(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    y_desc: &str,
    data: &[(String, f64)],
    format: &dyn Fn(f64) -> String,
) -> Result<()> {
    let categories = data.iter().map(|(name, _)| name.clone()).collect_vec();
    let y_max = data
        .iter()
        .map(|(_, value)| *value)
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE)
        * 1.25;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5..data.len() as f64 - 0.5, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(data.len())
        .x_label_formatter(&|x| charts::category_label(&categories, *x))
        .y_desc(y_desc)
        .x_desc("Engine Configuration")
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    for (index, (_, value)) in data.iter().enumerate() {
        let x_center = index as f64;

        chart.draw_series(std::iter::once(Rectangle::new(
            [(x_center - 0.3, 0.0), (x_center + 0.3, *value)],
            series_color(index).filled(),
        )))?;
        chart.draw_series(std::iter::once(charts::value_label(
            (x_center, value + y_max * 0.01),
            format(*value),
            true,
        )))?;
    }

    Ok(())
}

/// query type shares as a pie, labels and percentages on the slices
fn draw_pie(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    shares: &[(String, f64)],
) -> Result<()> {
    if shares.iter().map(|(_, share)| *share).sum::<f64>() <= 0.0 {
        return Ok(());
    }

    let area = area.titled(title, ("sans-serif", TITLE_FONT_SIZE))?;
    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.32;
    let sizes = shares.iter().map(|(_, share)| *share).collect_vec();
    let colors = (0..shares.len()).map(series_color).collect_vec();
    let labels = shares.iter().map(|(name, _)| name.clone()).collect_vec();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(
        ("sans-serif", TICK_LABEL_FONT_SIZE)
            .into_font()
            .color(&BLACK),
    );
    pie.percentages(
        ("sans-serif", DATA_LABEL_FONT_SIZE)
            .into_font()
            .color(&BLACK),
    );
    area.draw(&pie)?;

    Ok(())
}
