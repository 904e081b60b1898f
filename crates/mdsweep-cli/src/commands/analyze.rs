use crate::cli::AnalyzeArgs;
use crate::error::Result;
use mdsweep::analysis::{self, DensityProfiles, SorptionRegime};
use tracing::info;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let poly_path = args.dir.join(&args.poly);
    let solv_path = args.dir.join(&args.solv);

    info!("Loading density profiles from {:?}.", args.dir);
    let poly = DensityProfiles::from_file(&poly_path)?;
    let solv = DensityProfiles::from_file(&solv_path)?;
    info!(
        "Parsed {} polymer and {} solvent frame(s).",
        poly.num_frames(),
        solv.num_frames()
    );

    let poly_avg = poly.time_average();
    let solv_avg = solv.time_average();

    let overlap = analysis::overlap_integral(&poly_avg, &solv_avg)?;
    let regime = analysis::classify(&poly_avg, &solv_avg, args.overlap_threshold)?;

    println!("Instance: {}", args.dir.display());
    println!("  overlap integral: {overlap:.4}");
    println!(
        "  regime: {}",
        match regime {
            SorptionRegime::NoSorption => "no sorption",
            SorptionRegime::Adsorption => "adsorption (solvent on the brush surface)",
            SorptionRegime::Absorption => "absorption (solvent inside the brush)",
        }
    );

    Ok(())
}
