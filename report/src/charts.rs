pub mod comparison;
pub mod distribution;
pub mod impact;
pub mod success;
pub mod trends;

use anyhow::Result;
use benchviz_analysis::stats::Quartiles;
use plotters::{
    coord::{cartesian::Cartesian2d, combinators::LogCoord, types::RangedCoordf64},
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

pub(crate) const TITLE_FONT_SIZE: u32 = 30;
pub(crate) const AXIS_LABEL_FONT_SIZE: u32 = 20;
pub(crate) const TICK_LABEL_FONT_SIZE: u32 = 16;
pub(crate) const LEGEND_FONT_SIZE: u32 = 16;
pub(crate) const DATA_LABEL_FONT_SIZE: u32 = 13;

/// fixed series palette, one entry per engine type / category in sort order
pub(crate) const COLORS: &[RGBColor] = &[
    RGBColor(66, 133, 244),  // blue
    RGBColor(219, 68, 55),   // red
    RGBColor(244, 180, 0),   // yellow
    RGBColor(15, 157, 88),   // green
    RGBColor(171, 71, 188),  // purple
    RGBColor(0, 172, 193),   // teal
    RGBColor(255, 112, 67),  // orange
    RGBColor(93, 110, 130),  // slate
];

pub(crate) fn series_color(index: usize) -> RGBColor {
    COLORS[index % COLORS.len()]
}

/// rows of a two-column subplot grid
pub(crate) fn grid_rows(subplots: usize, columns: usize) -> usize {
    (subplots + columns - 1) / columns
}

/// Tick formatter for a categorical axis laid out at integer positions.
/// Off-center mesh ticks map to an empty label.
pub(crate) fn category_label(categories: &[String], x: f64) -> String {
    let index = x.round();

    if index >= 0.0 && (x - index).abs() < 0.3 {
        categories.get(index as usize).cloned().unwrap_or_default()
    } else {
        String::new()
    }
}

/// x position of a grouped bar/box within its category slot
pub(crate) fn group_offset(series_index: usize, series_count: usize, slot_width: f64) -> f64 {
    let width = slot_width / series_count as f64;

    (series_index as f64 - (series_count as f64 - 1.0) / 2.0) * width
}

pub(crate) fn value_label(position: (f64, f64), text: String, above: bool) -> Text<'static, (f64, f64), String> {
    let anchor = if above { VPos::Bottom } else { VPos::Top };

    Text::new(
        text,
        position,
        ("sans-serif", DATA_LABEL_FONT_SIZE)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, anchor)),
    )
}

/// one box of a grouped box plot, positioned on a categorical x axis
pub(crate) struct BoxSpec {
    pub x_center: f64,
    pub width: f64,
    pub color: RGBColor,
    pub quartiles: Quartiles,
}

/// draw box-and-whisker glyphs on a log-scaled chart
pub(crate) fn draw_boxes(
    chart: &mut ChartContext<'_, BitMapBackend<'_>, Cartesian2d<RangedCoordf64, LogCoord<f64>>>,
    boxes: &[BoxSpec],
) -> Result<()> {
    for spec in boxes {
        let half = spec.width / 2.0;
        let left = spec.x_center - half;
        let right = spec.x_center + half;
        let q = &spec.quartiles;

        // interquartile box
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, q.q1), (right, q.q3)],
            spec.color.mix(0.45).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, q.q1), (right, q.q3)],
            spec.color.stroke_width(1),
        )))?;

        // median line
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(left, q.median), (right, q.median)],
            spec.color.stroke_width(2),
        )))?;

        // whiskers with end caps
        let cap = spec.width / 4.0;
        for (from, to) in [(q.whisker_low, q.q1), (q.q3, q.whisker_high)] {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(spec.x_center, from), (spec.x_center, to)],
                spec.color.stroke_width(1),
            )))?;
        }
        for whisker in [q.whisker_low, q.whisker_high] {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(spec.x_center - cap, whisker), (spec.x_center + cap, whisker)],
                spec.color.stroke_width(1),
            )))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_covers_all_subplots() {
        assert_eq!(grid_rows(1, 2), 1);
        assert_eq!(grid_rows(2, 2), 1);
        assert_eq!(grid_rows(3, 2), 2);
        assert_eq!(grid_rows(8, 2), 4);
    }

    #[test]
    fn category_labels_only_at_slot_centers() {
        let categories = vec!["INSERT".to_string(), "DELETE".to_string()];

        assert_eq!(category_label(&categories, 0.0), "INSERT");
        assert_eq!(category_label(&categories, 1.05), "DELETE");
        assert_eq!(category_label(&categories, 0.5), "");
        assert_eq!(category_label(&categories, 7.0), "");
        assert_eq!(category_label(&categories, -1.0), "");
    }

    #[test]
    fn group_offsets_are_centered() {
        // two series split the slot symmetrically
        assert!((group_offset(0, 2, 0.8) + 0.2).abs() < 1e-12);
        assert!((group_offset(1, 2, 0.8) - 0.2).abs() < 1e-12);
        // odd counts keep the middle series on the slot center
        assert_eq!(group_offset(1, 3, 0.9), 0.0);
    }

    #[test]
    fn palette_wraps_around() {
        assert_eq!(series_color(0), series_color(COLORS.len()));
    }
}
