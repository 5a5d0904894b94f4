//! # estimate 命令实现
//!
//! 对整个数据集或一个区间区域估计一次化学势，并以表格输出。
//!
//! ## 依赖关系
//! - 使用 `cli/estimate.rs` 定义的参数
//! - 使用 `parsers/table.rs` 读取数据
//! - 使用 `potential/` 进行过滤与估计

use crate::cli::estimate::EstimateArgs;
use crate::error::{ChempotError, Result};
use crate::parsers;
use crate::potential::{export, RegionFilter};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 估计结果行
#[derive(Debug, Clone, Tabled)]
struct SpeciesRow {
    #[tabled(rename = "Species")]
    species: usize,
    #[tabled(rename = "Atoms")]
    atoms: usize,
    #[tabled(rename = "Concentration")]
    concentration: String,
    #[tabled(rename = "μ")]
    mu: String,
}

/// 执行 estimate 命令
pub fn execute(args: EstimateArgs) -> Result<()> {
    output::print_header("Chemical Potential Estimate");

    let dataset = parsers::parse_table_file(&args.input)?;
    output::print_success(&format!(
        "Loaded '{}' ({} atoms, {} species)",
        args.input.display(),
        dataset.len(),
        dataset.num_types()
    ));

    let filter = match (args.axis, args.low, args.high) {
        (Some(axis), Some(low), Some(high)) => RegionFilter::interval(axis, low, high)?,
        (None, None, None) => RegionFilter::Identity,
        _ => {
            return Err(ChempotError::InvalidArgument(
                "--axis, --low and --high must be given together".to_string(),
            ))
        }
    };

    let estimator = super::build_estimator(args.rcond)?;
    let selection = filter.employ(&dataset);
    output::print_info(&format!(
        "Region: {} ({} atoms, p = {:.6})",
        filter,
        selection.len(),
        selection.probability()
    ));

    let system = estimator.build_system(&selection)?;
    let potentials = estimator.solve(&system)?;
    if potentials.is_finite() {
        output::print_info(&format!(
            "Max |A μ - b| = {:.3e}",
            system.residual(&potentials).amax()
        ));
    } else {
        output::print_warning("Some chemical potentials are undetermined (NaN)");
    }

    let concentrations = selection.concentrations();
    let rows: Vec<SpeciesRow> = potentials
        .values()
        .iter()
        .zip(&concentrations)
        .enumerate()
        .map(|(k, (mu, c))| SpeciesRow {
            species: k + 1,
            atoms: (c * selection.len() as f64).round() as usize,
            concentration: format!("{:.4}", c),
            mu: format!("{:.8}", mu),
        })
        .collect();

    println!("{}", Table::new(&rows));

    if let Some(ref path) = args.output {
        export::potentials_to_csv(&potentials, &concentrations, path)?;
        output::print_success(&format!("Estimate saved to '{}'", path.display()));
    }

    Ok(())
}
