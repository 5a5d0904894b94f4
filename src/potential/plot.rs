//! # 化学势分布图
//!
//! 使用 `plotters` 绘制各原子类型化学势随分块中心坐标的散点图。
//!
//! ## 功能
//! - 每种原子类型一组散点，带图例
//! - NaN 点不参与绘制与坐标范围计算
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/sweep.rs` 调用
//! - 使用 `models/potential.rs` 的 ChunkEstimate
//! - 使用 `plotters` 渲染图表

use crate::error::{ChempotError, Result};
use crate::models::{Axis, ChunkEstimate};

use plotters::prelude::*;
use std::path::Path;

/// 图表尺寸与样式
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub use_svg: bool,
}

/// 生成化学势散点图
pub fn generate_potential_plot(
    results: &[ChunkEstimate],
    num_types: usize,
    axis: Axis,
    output_path: &Path,
    options: &PlotOptions,
) -> Result<()> {
    if options.use_svg {
        let root = SVGBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_potential_chart(&root, results, num_types, axis, &options.title)?;
        root.present()
            .map_err(|e| ChempotError::PlotError(e.to_string()))?;
    } else {
        let root =
            BitMapBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_potential_chart(&root, results, num_types, axis, &options.title)?;
        root.present()
            .map_err(|e| ChempotError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 有限值范围，外扩 5%
fn padded_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return None;
    }
    let margin = if max > min { (max - min) * 0.05 } else { 0.5 };
    Some((min - margin, max + margin))
}

/// 绘制散点图的核心逻辑
fn draw_potential_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    results: &[ChunkEstimate],
    num_types: usize,
    axis: Axis,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| ChempotError::PlotError(format!("{:?}", e)))?;

    let (x_min, x_max) = padded_range(results.iter().map(|r| r.center))
        .ok_or_else(|| ChempotError::PlotError("No finite chunk centers to plot".to_string()))?;
    let (y_min, y_max) = padded_range(
        results
            .iter()
            .flat_map(|r| r.potentials.values().iter().copied()),
    )
    .ok_or_else(|| ChempotError::PlotError("No finite chemical potentials to plot".to_string()))?;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| ChempotError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc(format!("Chunk center along {}", axis))
        .y_desc("Chemical potential")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| ChempotError::PlotError(format!("{:?}", e)))?;

    for k in 0..num_types {
        let color = Palette99::pick(k).to_rgba();
        let points: Vec<(f64, f64)> = results
            .iter()
            .filter_map(|r| r.potentials.get(k).map(|mu| (r.center, mu)))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();

        chart
            .draw_series(
                points
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 3, color.filled())),
            )
            .map_err(|e| ChempotError::PlotError(format!("{:?}", e)))?
            .label(format!("mu_{}", k + 1))
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| ChempotError::PlotError(format!("{:?}", e)))?;

    Ok(())
}
