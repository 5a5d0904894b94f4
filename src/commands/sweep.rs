//! # sweep 命令实现
//!
//! 沿坐标轴分块扫描化学势。
//!
//! ## 功能
//! - 单文件模式：扫描一个快照，输出表格并可选绘图
//! - 批量模式：扫描目录中所有匹配的快照（rayon 并行）
//! - 输出 DAT/CSV
//!
//! ## 依赖关系
//! - 使用 `cli/sweep.rs` 定义的 SweepArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `potential/` 模块进行计算、导出和绘图
//! - 使用 `parsers/` 读取数值表

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::sweep::{SweepArgs, SweepOutputFormat};
use crate::error::{ChempotError, Result};
use crate::models::{Axis, ChunkEstimate, Dataset};
use crate::parsers;
use crate::potential::plot::{self, PlotOptions};
use crate::potential::{export, ChemicalPotentialEstimator, ChunkSweep, SortedAxis};
use crate::utils::{output, progress};

use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// 执行 sweep 命令
pub fn execute(args: SweepArgs) -> Result<()> {
    output::print_header("Chemical Potential Chunk Sweep");

    if args.input.is_file() {
        execute_single_file(&args)
    } else if args.input.is_dir() {
        execute_batch(&args)
    } else {
        Err(ChempotError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(args: &SweepArgs) -> Result<()> {
    let dataset = parsers::parse_table_file(&args.input)?;
    output::print_success(&format!(
        "Loaded '{}' ({} atoms, {} species)",
        args.input.display(),
        dataset.len(),
        dataset.num_types()
    ));

    let num_windows = SortedAxis::new(&dataset, args.axis).window_count(args.window_size)?;
    output::print_info(&format!(
        "Axis {}, {} atoms per chunk, {} chunks",
        args.axis, args.window_size, num_windows
    ));

    let sweep = ChunkSweep::new(args.axis, args.window_size)
        .with_estimator(super::build_estimator(args.rcond)?)
        .with_jobs(args.jobs);

    let pb = progress::create_progress_bar(num_windows as u64, "Estimating");
    let results = sweep.run_with_progress(&dataset, Some(&pb));
    pb.finish_and_clear();
    let results = results?;

    let undetermined = results
        .iter()
        .filter(|r| !r.potentials.is_finite())
        .count();
    if undetermined > 0 {
        output::print_warning(&format!(
            "{} chunks contain undetermined (NaN) chemical potentials",
            undetermined
        ));
    }

    let format = args
        .format
        .unwrap_or_else(|| guess_format_from_extension(&args.output));
    write_results(&results, dataset.num_types(), &args.output, format)?;
    output::print_success(&format!(
        "Chemical potentials saved to '{}'",
        args.output.display()
    ));

    if let Some(ref plot_path) = args.plot {
        plot::generate_potential_plot(
            &results,
            dataset.num_types(),
            args.axis,
            plot_path,
            &plot_options(args, plot_path, &dataset_title(&args.input)),
        )?;
        output::print_success(&format!("Plot saved to '{}'", plot_path.display()));
    }

    print_summary(&results, &dataset);

    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &SweepArgs) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let files = FileCollector::new(args.input.clone(), &args.pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} snapshot files", files.len()));

    fs::create_dir_all(&args.output).map_err(|e| ChempotError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let config = BatchSweepConfig {
        output_dir: args.output.clone(),
        axis: args.axis,
        window_size: args.window_size,
        estimator: super::build_estimator(args.rcond)?,
        format: args.format.unwrap_or(SweepOutputFormat::Dat),
        plot_ext: args.plot.as_deref().map(plot_extension),
        width: args.width,
        height: args.height,
        overwrite: args.overwrite,
    };

    // 文件间并行，单个文件内串行
    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(&files, |file| process_batch_file(file, &config))?;

    for msg in &result.completed {
        output::print_success(msg);
    }
    for msg in &result.skips {
        output::print_skip(msg);
    }

    output::print_separator();
    output::print_success(&format!(
        "Batch complete ({} files): {} success, {} skipped, {} failed",
        result.total(),
        result.success,
        result.skipped,
        result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 批量处理配置
struct BatchSweepConfig {
    output_dir: PathBuf,
    axis: Axis,
    window_size: usize,
    estimator: ChemicalPotentialEstimator,
    format: SweepOutputFormat,
    plot_ext: Option<&'static str>,
    width: u32,
    height: u32,
    overwrite: bool,
}

/// 处理批量模式中的单个文件
fn process_batch_file(input: &PathBuf, config: &BatchSweepConfig) -> ProcessResult {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_file = config
        .output_dir
        .join(format!("{}_mu.{}", stem, config.format.extension()));

    if output_file.exists() && !config.overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            output_file.display()
        ));
    }

    match sweep_file(input, &output_file, stem, config) {
        Ok(n) => ProcessResult::Success(format!(
            "{} -> {} ({} chunks)",
            input.display(),
            output_file.display(),
            n
        )),
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 扫描单个快照并写出结果，返回分块数
fn sweep_file(
    input: &Path,
    output_file: &Path,
    stem: &str,
    config: &BatchSweepConfig,
) -> Result<usize> {
    let dataset = parsers::parse_table_file(input)?;

    let results = ChunkSweep::new(config.axis, config.window_size)
        .with_estimator(config.estimator)
        .with_jobs(1)
        .run(&dataset)?;

    write_results(&results, dataset.num_types(), output_file, config.format)?;

    if let Some(ext) = config.plot_ext {
        let plot_path = config.output_dir.join(format!("{}_mu.{}", stem, ext));
        let options = PlotOptions {
            title: stem.to_string(),
            width: config.width,
            height: config.height,
            use_svg: ext == "svg",
        };
        plot::generate_potential_plot(
            &results,
            dataset.num_types(),
            config.axis,
            &plot_path,
            &options,
        )?;
    }

    Ok(results.len())
}

/// 按格式写出扫描结果
fn write_results(
    results: &[ChunkEstimate],
    num_types: usize,
    output_path: &Path,
    format: SweepOutputFormat,
) -> Result<()> {
    match format {
        SweepOutputFormat::Dat => export::to_dat(results, num_types, output_path),
        SweepOutputFormat::Csv => export::to_csv(results, num_types, output_path),
    }
}

/// 从文件扩展名推断输出格式
fn guess_format_from_extension(path: &Path) -> SweepOutputFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("csv") => SweepOutputFormat::Csv,
        _ => SweepOutputFormat::Dat,
    }
}

/// 图像扩展名（svg 或 png）
fn plot_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => "svg",
        _ => "png",
    }
}

fn plot_options(args: &SweepArgs, plot_path: &Path, title: &str) -> PlotOptions {
    PlotOptions {
        title: title.to_string(),
        width: args.width,
        height: args.height,
        use_svg: plot_extension(plot_path) == "svg",
    }
}

fn dataset_title(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("chemical potentials")
        .to_string()
}

/// 打印各原子类型的化学势统计
fn print_summary(results: &[ChunkEstimate], dataset: &Dataset) {
    #[derive(Tabled)]
    struct SummaryRow {
        #[tabled(rename = "Species")]
        species: usize,
        #[tabled(rename = "Atoms")]
        atoms: usize,
        #[tabled(rename = "Mean μ")]
        mean: String,
        #[tabled(rename = "Min μ")]
        min: String,
        #[tabled(rename = "Max μ")]
        max: String,
    }

    let counts = dataset.species_counts();
    let rows: Vec<SummaryRow> = (0..dataset.num_types())
        .map(|k| {
            let values: Vec<f64> = results
                .iter()
                .filter_map(|r| r.potentials.get(k))
                .filter(|v| v.is_finite())
                .collect();
            let (mean, min, max) = if values.is_empty() {
                (f64::NAN, f64::NAN, f64::NAN)
            } else {
                (
                    values.iter().sum::<f64>() / values.len() as f64,
                    values.iter().copied().fold(f64::INFINITY, f64::min),
                    values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                )
            };
            SummaryRow {
                species: k + 1,
                atoms: counts[k],
                mean: format!("{:.6}", mean),
                min: format!("{:.6}", min),
                max: format!("{:.6}", max),
            }
        })
        .collect();

    if let (Some(first), Some(last)) = (results.first(), results.last()) {
        output::print_header(&format!(
            "{} chunks, centers {:.4} .. {:.4}",
            results.len(),
            first.center,
            last.center
        ));
    }
    println!("{}", Table::new(&rows));
}
